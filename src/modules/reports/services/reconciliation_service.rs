use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error, info};

use crate::core::Month;
use crate::modules::collaborators::{PaymentClient, RegistrationClient};
use crate::modules::reports::error::ReportError;
use crate::modules::reports::models::{RebuildSummary, Report, ReportBucket};
use crate::modules::reports::repositories::ReportRepository;

/// Which persistence pass a save belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Create,
    Update,
}

/// Rebuilds the full report set from the registration and payment services.
///
/// A rebuild clears the store, classifies every enrolled student of every
/// tuition for each of the twelve months, then persists the paid and unpaid
/// lists twice: once to create the rows, once to finalize them. Both lists
/// carry one entry per student-month, flagged as included or not. Each of the
/// four passes reports its own error so a caller can tell an unfinished
/// generation from an unfinalized one.
///
/// Rebuilds are serialized. Readers that hold [`ReconciliationService::read_guard`]
/// never observe a store in the middle of a rebuild.
pub struct ReconciliationService {
    report_repo: Arc<dyn ReportRepository>,
    registration: Arc<dyn RegistrationClient>,
    payments: Arc<dyn PaymentClient>,
    generation_lock: RwLock<()>,
    generation: AtomicU64,
    last_success: Mutex<Option<Instant>>,
}

impl ReconciliationService {
    pub fn new(
        report_repo: Arc<dyn ReportRepository>,
        registration: Arc<dyn RegistrationClient>,
        payments: Arc<dyn PaymentClient>,
    ) -> Self {
        Self {
            report_repo,
            registration,
            payments,
            generation_lock: RwLock::new(()),
            generation: AtomicU64::new(0),
            last_success: Mutex::new(None),
        }
    }

    /// Replace the stored report set with a freshly computed one
    pub async fn rebuild(&self) -> Result<RebuildSummary, ReportError> {
        self.rebuild_and_hold().await.map(|(summary, _)| summary)
    }

    /// Rebuild, then keep shared access to the generation just written.
    ///
    /// The write lock is downgraded in place, so no other rebuild can run
    /// between this one finishing and the caller reading its result.
    pub async fn rebuild_and_hold(
        &self,
    ) -> Result<(RebuildSummary, RwLockReadGuard<'_, ()>), ReportError> {
        let exclusive = self.generation_lock.write().await;
        let summary = self.rebuild_locked().await?;
        Ok((summary, exclusive.downgrade()))
    }

    async fn rebuild_locked(&self) -> Result<RebuildSummary, ReportError> {
        let started = Instant::now();
        info!("Rebuilding payment status reports");

        self.report_repo.delete_all().await.map_err(|source| {
            error!(error = %source, "Failed to clear previous reports");
            ReportError::UpdateFailed { bucket: None, source }
        })?;

        let tuitions = self.registration.list_tuitions().await.map_err(|source| {
            error!(error = %source, "Failed to get tuition list from registration service");
            ReportError::RegistrationUnavailable(source)
        })?;

        let mut paid_reports = Vec::new();
        let mut unpaid_reports = Vec::new();
        let mut paid_count = 0;

        for tuition in &tuitions {
            let students = tuition.distinct_student_ids();
            for month in Month::all() {
                let paid_students = self
                    .payments
                    .get_paid_students(&tuition.tuition_id, month)
                    .await
                    .map_err(|source| {
                        error!(
                            error = %source,
                            tuition_id = %tuition.tuition_id,
                            month = %month,
                            "Failed to get paid students from payment service"
                        );
                        ReportError::PaymentUnavailable {
                            tuition_id: tuition.tuition_id.clone(),
                            month,
                            source,
                        }
                    })?;

                for student_id in &students {
                    let is_paid = paid_students.contains(*student_id);
                    if is_paid {
                        paid_count += 1;
                    }
                    paid_reports.push(Report::for_bucket(
                        &tuition.tuition_id,
                        month,
                        *student_id,
                        ReportBucket::Paid,
                        is_paid,
                    ));
                    unpaid_reports.push(Report::for_bucket(
                        &tuition.tuition_id,
                        month,
                        *student_id,
                        ReportBucket::Unpaid,
                        !is_paid,
                    ));
                }
            }
            debug!(
                tuition_id = %tuition.tuition_id,
                students = students.len(),
                "Classified tuition for all months"
            );
        }

        let mut save_calls = 0;
        save_calls += self.persist(&mut paid_reports, ReportBucket::Paid, Phase::Create).await?;
        save_calls += self.persist(&mut unpaid_reports, ReportBucket::Unpaid, Phase::Create).await?;
        save_calls += self.persist(&mut paid_reports, ReportBucket::Paid, Phase::Update).await?;
        save_calls += self.persist(&mut unpaid_reports, ReportBucket::Unpaid, Phase::Update).await?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut last) = self.last_success.lock() {
            *last = Some(Instant::now());
        }

        let summary = RebuildSummary {
            generation,
            tuitions: tuitions.len(),
            paid_reports: paid_count,
            unpaid_reports: unpaid_reports.len() - paid_count,
            save_calls,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            generation = summary.generation,
            tuitions = summary.tuitions,
            paid = summary.paid_reports,
            unpaid = summary.unpaid_reports,
            elapsed_ms = summary.elapsed_ms,
            "Payment status reports rebuilt"
        );

        Ok(summary)
    }

    /// Save every report of one list, in order. Saved rows replace the
    /// in-memory entries so the update pass upserts the same ids.
    async fn persist(
        &self,
        reports: &mut [Report],
        bucket: ReportBucket,
        phase: Phase,
    ) -> Result<usize, ReportError> {
        for report in reports.iter_mut() {
            if phase == Phase::Update {
                report.touch();
            }

            let saved = self.report_repo.save(report).await.map_err(|source| {
                error!(
                    error = %source,
                    bucket = %bucket,
                    phase = ?phase,
                    tuition_id = %report.tuition_id,
                    month = %report.month,
                    "Failed to persist report"
                );
                match phase {
                    Phase::Create => ReportError::CreateFailed { bucket, source },
                    Phase::Update => ReportError::UpdateFailed {
                        bucket: Some(bucket),
                        source,
                    },
                }
            })?;
            *report = saved;
        }

        debug!(bucket = %bucket, phase = ?phase, count = reports.len(), "Persisted report list");
        Ok(reports.len())
    }

    /// Shared access to the current generation; blocks while a rebuild runs
    pub async fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.generation_lock.read().await
    }

    /// Number of successful rebuilds so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// When the last successful rebuild finished
    pub fn last_success(&self) -> Option<Instant> {
        self.last_success.lock().ok().and_then(|last| *last)
    }
}
