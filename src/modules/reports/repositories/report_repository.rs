use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::Month;
use crate::modules::reports::models::Report;

/// Storage failure inside the report store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt report row {id}: {reason}")]
    CorruptRow { id: String, reason: String },

    #[error("Report store unavailable: {0}")]
    Unavailable(String),
}

/// Durable keyed storage of report rows
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Remove every stored report
    async fn delete_all(&self) -> Result<(), StoreError>;

    /// Upsert by id. A report without an id is inserted under a fresh one.
    /// Returns the stored row.
    async fn save(&self, report: &Report) -> Result<Report, StoreError>;

    /// First included report for the key, ordered by `created_at` then `student_id`
    async fn find_one(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Option<Report>, StoreError>;

    /// Every included report for the key, in the same order as `find_one`
    async fn find_all(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Vec<Report>, StoreError>;
}

/// Copy of `report` carrying its existing id, or a new one if unsaved
pub(crate) fn with_id(report: &Report) -> Report {
    let mut stored = report.clone();
    if stored.id.is_none() {
        stored.id = Some(Uuid::new_v4().to_string());
    }
    stored
}

pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: String,
    tuition_id: String,
    month: String,
    student_id: String,
    is_paid: bool,
    included: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = StoreError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let month = row.month.parse::<Month>().map_err(|e| StoreError::CorruptRow {
            id: row.id.clone(),
            reason: e.to_string(),
        })?;

        Ok(Report {
            id: Some(row.id),
            tuition_id: row.tuition_id,
            month,
            student_id: row.student_id,
            is_paid: row.is_paid,
            included: row.included,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_BY_KEY: &str = r#"
    SELECT id, tuition_id, month, student_id, is_paid, included, created_at, updated_at
    FROM reports
    WHERE tuition_id = ? AND month = ? AND is_paid = ? AND included = TRUE
    ORDER BY created_at, student_id
"#;

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM reports").execute(&self.pool).await?;
        Ok(())
    }

    async fn save(&self, report: &Report) -> Result<Report, StoreError> {
        let stored = with_id(report);

        sqlx::query(
            r#"
            INSERT INTO reports (
                id, tuition_id, month, student_id, is_paid, included, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                tuition_id = VALUES(tuition_id),
                month = VALUES(month),
                student_id = VALUES(student_id),
                is_paid = VALUES(is_paid),
                included = VALUES(included),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(stored.id.as_deref())
        .bind(&stored.tuition_id)
        .bind(stored.month.as_str())
        .bind(&stored.student_id)
        .bind(stored.is_paid)
        .bind(stored.included)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_one(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Option<Report>, StoreError> {
        let query = format!("{} LIMIT 1", SELECT_BY_KEY);
        let row = sqlx::query_as::<_, ReportRow>(&query)
            .bind(tuition_id)
            .bind(month.as_str())
            .bind(is_paid)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Report::try_from).transpose()
    }

    async fn find_all(
        &self,
        tuition_id: &str,
        month: Month,
        is_paid: bool,
    ) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query_as::<_, ReportRow>(SELECT_BY_KEY)
            .bind(tuition_id)
            .bind(month.as_str())
            .bind(is_paid)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Report::try_from).collect()
    }
}
