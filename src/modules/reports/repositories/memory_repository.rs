use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::report_repository::{with_id, ReportRepository, StoreError};
use crate::core::Month;
use crate::modules::reports::models::Report;

/// Process-local report store, used with `REPORT_STORE=memory` and in tests
#[derive(Default)]
pub struct InMemoryReportRepository {
    rows: Mutex<HashMap<String, Report>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Report>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory report store poisoned".to_string()))
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored row, included or not, sorted like `find_all`
    pub fn all(&self) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .rows()
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        sort_reports(&mut reports);
        reports
    }
}

fn sort_reports(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn delete_all(&self) -> Result<(), StoreError> {
        self.rows()?.clear();
        Ok(())
    }

    async fn save(&self, report: &Report) -> Result<Report, StoreError> {
        let stored = with_id(report);
        if let Some(id) = stored.id.clone() {
            self.rows()?.insert(id, stored.clone());
        }
        Ok(stored)
    }

    async fn find_one(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Option<Report>, StoreError> {
        Ok(self
            .find_all(tuition_id, month, is_paid)
            .await?
            .into_iter()
            .next())
    }

    async fn find_all(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Vec<Report>, StoreError> {
        let mut matches: Vec<Report> = self
            .rows()?
            .values()
            .filter(|r| {
                r.included && r.tuition_id == tuition_id && r.month == month && r.is_paid == is_paid
            })
            .cloned()
            .collect();
        sort_reports(&mut matches);
        Ok(matches)
    }
}
