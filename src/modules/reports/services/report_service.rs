use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLockReadGuard;
use tracing::{debug, warn};

use super::reconciliation_service::ReconciliationService;
use super::refresh_policy::RefreshPolicy;
use crate::core::Month;
use crate::modules::reports::error::ReportError;
use crate::modules::reports::models::{RebuildSummary, Report, TuitionMonthReport};
use crate::modules::reports::repositories::ReportRepository;

/// Serves stored reports, refreshing them first according to the policy
pub struct ReportService {
    engine: Arc<ReconciliationService>,
    report_repo: Arc<dyn ReportRepository>,
    policy: RefreshPolicy,
    invalidated: AtomicBool,
}

impl ReportService {
    pub fn new(
        engine: Arc<ReconciliationService>,
        report_repo: Arc<dyn ReportRepository>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            engine,
            report_repo,
            policy,
            invalidated: AtomicBool::new(false),
        }
    }

    /// The report for one tuition, month and paid flag.
    ///
    /// `month` must already be validated. Under the default policy every call
    /// rebuilds the whole report set first.
    pub async fn get_report(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Report, ReportError> {
        let _snapshot = self.fresh_snapshot().await?;
        self.find_report(tuition_id, month, is_paid).await
    }

    /// Paid and unpaid reports of one tuition-month, refreshed once
    pub async fn get_tuition_month_report(
        &self,
        tuition_id: &str,
        month: Month,
    ) -> Result<TuitionMonthReport, ReportError> {
        let _snapshot = self.fresh_snapshot().await?;

        let paid_report = self.find_report(tuition_id, month, true).await?;
        let unpaid_report = self.find_report(tuition_id, month, false).await?;

        Ok(TuitionMonthReport {
            paid_report,
            unpaid_report,
            paid_student_ids: self.student_ids(tuition_id, month, true).await?,
            unpaid_student_ids: self.student_ids(tuition_id, month, false).await?,
        })
    }

    /// Rebuild now, regardless of policy
    pub async fn refresh(&self) -> Result<RebuildSummary, ReportError> {
        self.rebuild_and_hold().await.map(|(summary, _)| summary)
    }

    /// Force the next read to rebuild
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    async fn rebuild_and_hold(
        &self,
    ) -> Result<(RebuildSummary, RwLockReadGuard<'_, ()>), ReportError> {
        match self.engine.rebuild_and_hold().await {
            Ok(rebuilt) => {
                self.invalidated.store(false, Ordering::SeqCst);
                Ok(rebuilt)
            }
            Err(e) => {
                // the store may now hold a partial generation
                self.invalidated.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Shared access to a generation that satisfies the policy.
    ///
    /// When a rebuild is needed the guard comes from that rebuild, so the
    /// caller reads exactly the generation it built.
    async fn fresh_snapshot(&self) -> Result<RwLockReadGuard<'_, ()>, ReportError> {
        let shared = self.engine.read_guard().await;
        let invalidated = self.invalidated.load(Ordering::SeqCst);
        if !self.policy.needs_rebuild(self.engine.last_success(), invalidated) {
            debug!(generation = self.engine.generation(), "Serving cached report generation");
            return Ok(shared);
        }
        drop(shared);

        let (_, snapshot) = self.rebuild_and_hold().await?;
        Ok(snapshot)
    }

    async fn find_report(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Report, ReportError> {
        self.report_repo
            .find_one(tuition_id, month, is_paid)
            .await
            .map_err(ReportError::Store)?
            .ok_or_else(|| {
                warn!(tuition_id = %tuition_id, month = %month, is_paid, "Report not found");
                ReportError::ReportNotFound {
                    tuition_id: tuition_id.to_string(),
                    month,
                    is_paid,
                }
            })
    }

    async fn student_ids(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Vec<String>, ReportError> {
        Ok(self
            .report_repo
            .find_all(tuition_id, month, is_paid)
            .await
            .map_err(ReportError::Store)?
            .into_iter()
            .map(|report| report.student_id)
            .collect())
    }
}
