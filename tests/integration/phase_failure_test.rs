// Store failures in each persistence pass
//
// One tuition, one student, paid only in MARCH. Every student gets an entry
// in both bucket lists, so save order is:
//   1..=12   create paid
//   13..=24  create unpaid
//   25..=36  update paid
//   37..=48  update unpaid

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use tuition_reports::core::Month;
use tuition_reports::modules::reports::{ReportBucket, ReportError};

fn harness_failing_at(save: usize) -> Harness {
    Harness::new(
        FaultyStore::failing_save_at(save),
        ScriptedRegistration::new(vec![tuition("T1", &["S1"])]),
        ScriptedPayments::new().paid("T1", Month::March, &["S1"]),
    )
}

#[tokio::test]
async fn test_create_paid_failure() {
    let harness = harness_failing_at(1);

    let err = harness.engine.rebuild().await.unwrap_err();

    assert!(matches!(
        err,
        ReportError::CreateFailed {
            bucket: ReportBucket::Paid,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Error creating paid report list");
    assert_eq!(harness.store.save_calls(), 1);
    assert_eq!(harness.store.len(), 0);
}

#[tokio::test]
async fn test_create_unpaid_failure() {
    let harness = harness_failing_at(13);

    let err = harness.engine.rebuild().await.unwrap_err();

    assert!(matches!(
        err,
        ReportError::CreateFailed {
            bucket: ReportBucket::Unpaid,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Error creating unpaid report list");
    // the paid list was already written
    assert_eq!(harness.store.len(), 12);
    assert_eq!(harness.store.save_calls(), 13);
}

#[tokio::test]
async fn test_update_paid_failure() {
    let harness = harness_failing_at(25);

    let err = harness.engine.rebuild().await.unwrap_err();

    assert!(matches!(
        err,
        ReportError::UpdateFailed {
            bucket: Some(ReportBucket::Paid),
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed to update paid report list");
    // every entry exists, none finalized
    assert_eq!(harness.store.len(), 24);
    assert_eq!(harness.store.save_calls(), 25);
}

#[tokio::test]
async fn test_update_unpaid_failure() {
    let harness = harness_failing_at(37);

    let err = harness.engine.rebuild().await.unwrap_err();

    assert!(matches!(
        err,
        ReportError::UpdateFailed {
            bucket: Some(ReportBucket::Unpaid),
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed to update unpaid report list");
    assert_eq!(harness.store.len(), 24);
    assert_eq!(harness.store.save_calls(), 37);
}

#[tokio::test]
async fn test_failed_rebuild_does_not_advance_generation() {
    let harness = harness_failing_at(48);

    assert!(harness.engine.rebuild().await.is_err());

    assert_eq!(harness.engine.generation(), 0);
    assert!(harness.engine.last_success().is_none());
}

#[tokio::test]
async fn test_last_save_succeeding_completes_rebuild() {
    let harness = harness_failing_at(49);

    let summary = harness.engine.rebuild().await.expect("rebuild failed");

    assert_eq!(summary.save_calls, 48);
    assert_eq!(summary.paid_reports, 1);
    assert_eq!(summary.unpaid_reports, 11);
    assert_eq!(harness.engine.generation(), 1);
}

#[tokio::test]
async fn test_update_pass_reuses_created_ids() {
    let harness = harness_failing_at(49);
    harness.engine.rebuild().await.unwrap();

    // 48 saves produced 24 entries: the update pass upserted the same ids
    let reports = harness.store.reports();
    assert_eq!(reports.len(), 24);
    let mut ids: Vec<_> = reports.iter().filter_map(|r| r.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 24);
}

#[tokio::test]
async fn test_each_student_has_one_included_entry_per_month() {
    let harness = harness_failing_at(49);
    harness.engine.rebuild().await.unwrap();

    let reports = harness.store.reports();
    for month in Month::ALL {
        let entries: Vec<_> = reports.iter().filter(|r| r.month == month).collect();
        assert_eq!(entries.len(), 2);
        let included: Vec<_> = entries.iter().filter(|r| r.included).collect();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].is_paid, month == Month::March);
    }
}
