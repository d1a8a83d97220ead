// Property-based tests for the paid / unpaid partition of a rebuild

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::HashSet;

use helpers::*;
use proptest::prelude::*;
use tuition_reports::core::Month;

/// Student `s` of tuition `t` paid in `month` when the matching bit of the seed is set
fn paid_bit(seed: u64, month: Month, student: usize) -> bool {
    let index = Month::ALL.iter().position(|m| *m == month).unwrap_or(0);
    (seed >> ((index * 5 + student) % 64)) & 1 == 1
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every enrolled student is included in exactly one bucket per month,
    /// and each student gets four saves per month across the passes
    #[test]
    fn prop_rebuild_partitions_students(
        enrollments in prop::collection::vec(prop::collection::vec(0usize..5, 0..6), 1..4),
        seeds in prop::collection::vec(any::<u64>(), 4),
    ) {
        let tuitions: Vec<_> = enrollments
            .iter()
            .enumerate()
            .map(|(t, students)| {
                let ids: Vec<String> = students.iter().map(|s| format!("sid-{}", s)).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                tuition(&format!("tid-{}", t), &refs)
            })
            .collect();

        let payments = ScriptedPayments::new();
        for (t, students) in enrollments.iter().enumerate() {
            for month in Month::all() {
                let paid: Vec<String> = students
                    .iter()
                    .filter(|s| paid_bit(seeds[t], month, **s))
                    .map(|s| format!("sid-{}", s))
                    .collect();
                let refs: Vec<&str> = paid.iter().map(String::as_str).collect();
                payments.set_paid(&format!("tid-{}", t), month, &refs);
            }
        }

        let harness = Harness::new(
            FaultyStore::new(),
            ScriptedRegistration::new(tuitions.clone()),
            payments,
        );
        let summary = runtime().block_on(harness.engine.rebuild()).expect("rebuild failed");

        let distinct_total: usize = tuitions.iter().map(|t| t.distinct_student_ids().len()).sum();
        let rows = harness.store.reports();

        prop_assert_eq!(rows.len(), 2 * distinct_total * 12);
        prop_assert_eq!(rows.iter().filter(|r| r.included).count(), distinct_total * 12);
        prop_assert_eq!(summary.paid_reports + summary.unpaid_reports, distinct_total * 12);
        prop_assert_eq!(harness.store.save_calls(), 4 * distinct_total * 12);
        prop_assert_eq!(summary.save_calls, 4 * distinct_total * 12);
        prop_assert_eq!(harness.payments.calls(), tuitions.len() * 12);

        for (t, students) in enrollments.iter().enumerate() {
            let tuition_id = format!("tid-{}", t);
            let enrolled: HashSet<String> = students.iter().map(|s| format!("sid-{}", s)).collect();

            for month in Month::all() {
                let in_month: Vec<_> = rows
                    .iter()
                    .filter(|r| r.included && r.tuition_id == tuition_id && r.month == month)
                    .collect();

                let paid: HashSet<&str> = in_month.iter().filter(|r| r.is_paid).map(|r| r.student_id.as_str()).collect();
                let unpaid: HashSet<&str> = in_month.iter().filter(|r| !r.is_paid).map(|r| r.student_id.as_str()).collect();

                // at most one row per student and bucket
                prop_assert_eq!(paid.len() + unpaid.len(), in_month.len());
                prop_assert!(paid.is_disjoint(&unpaid));

                let union: HashSet<String> = paid.union(&unpaid).map(|s| s.to_string()).collect();
                prop_assert_eq!(&union, &enrolled);

                for student in students {
                    let id = format!("sid-{}", student);
                    prop_assert_eq!(paid.contains(id.as_str()), paid_bit(seeds[t], month, *student));
                }
            }
        }
    }

    /// Property: a tuition without students produces no rows but is still queried for every month
    #[test]
    fn prop_empty_tuitions_produce_no_rows(count in 1usize..5) {
        let tuitions = (0..count).map(|t| tuition(&format!("tid-{}", t), &[])).collect();
        let harness = Harness::new(
            FaultyStore::new(),
            ScriptedRegistration::new(tuitions),
            ScriptedPayments::with_default(&[STUDENT_ID]),
        );

        let summary = runtime().block_on(harness.engine.rebuild()).expect("rebuild failed");

        prop_assert_eq!(harness.store.len(), 0);
        prop_assert_eq!(summary.save_calls, 0);
        prop_assert_eq!(harness.payments.calls(), count * 12);
    }
}
