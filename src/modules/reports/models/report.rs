use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Month;

/// Entry of one enrolled student in one bucket (paid or unpaid) of a
/// tuition-month.
///
/// Every student gets an entry in both buckets on each rebuild; `included`
/// marks the bucket the student actually belongs to. Lookups only see
/// included entries. Rows are derived data: the whole set is replaced on
/// every rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Assigned by the store on first save
    pub id: Option<String>,
    pub tuition_id: String,
    pub month: Month,
    pub student_id: String,
    pub is_paid: bool,
    pub included: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create an unsaved row placing the student in the `is_paid` bucket
    pub fn new(
        tuition_id: impl Into<String>,
        month: Month,
        student_id: impl Into<String>,
        is_paid: bool,
    ) -> Self {
        Self::for_bucket(
            tuition_id,
            month,
            student_id,
            ReportBucket::from_paid(is_paid),
            true,
        )
    }

    /// Create an unsaved bucket entry, included or not
    pub fn for_bucket(
        tuition_id: impl Into<String>,
        month: Month,
        student_id: impl Into<String>,
        bucket: ReportBucket,
        included: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            tuition_id: tuition_id.into(),
            month,
            student_id: student_id.into(),
            is_paid: bucket.is_paid(),
            included,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn bucket(&self) -> ReportBucket {
        ReportBucket::from_paid(self.is_paid)
    }

    /// Mark the row as finalized by the update pass
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The paid / unpaid split of a tuition-month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportBucket {
    Paid,
    Unpaid,
}

impl ReportBucket {
    pub fn from_paid(is_paid: bool) -> Self {
        if is_paid {
            ReportBucket::Paid
        } else {
            ReportBucket::Unpaid
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, ReportBucket::Paid)
    }
}

impl fmt::Display for ReportBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportBucket::Paid => write!(f, "paid"),
            ReportBucket::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// Outcome of one successful rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub generation: u64,
    pub tuitions: usize,
    /// Student-months confirmed as paid
    pub paid_reports: usize,
    /// Student-months not paid
    pub unpaid_reports: usize,
    pub save_calls: usize,
    pub elapsed_ms: u64,
}

/// Both buckets of one tuition-month, as served at the boundary
#[derive(Debug, Clone, Serialize)]
pub struct TuitionMonthReport {
    pub paid_report: Report,
    pub unpaid_report: Report,
    pub paid_student_ids: Vec<String>,
    pub unpaid_student_ids: Vec<String>,
}
