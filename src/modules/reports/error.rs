use crate::core::Month;
use crate::modules::collaborators::CollaboratorError;
use crate::modules::reports::models::ReportBucket;
use crate::modules::reports::repositories::StoreError;

/// Failures of a rebuild or a report lookup.
///
/// `CreateFailed` means the new generation was never fully written; the store
/// may be empty or partial. `UpdateFailed` with a bucket means every row was
/// written but the finalization pass broke.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    RegistrationUnavailable(CollaboratorError),

    #[error("{source} (tuition: {tuition_id}, month: {month})")]
    PaymentUnavailable {
        tuition_id: String,
        month: Month,
        #[source]
        source: CollaboratorError,
    },

    #[error("Error creating {bucket} report list")]
    CreateFailed {
        bucket: ReportBucket,
        #[source]
        source: StoreError,
    },

    /// `bucket` is `None` when clearing the previous generation failed
    #[error("{}", update_failed_message(.bucket))]
    UpdateFailed {
        bucket: Option<ReportBucket>,
        #[source]
        source: StoreError,
    },

    #[error("Report not found for tuition {tuition_id}, month {month}, paid {is_paid}")]
    ReportNotFound {
        tuition_id: String,
        month: Month,
        is_paid: bool,
    },

    #[error("Failed to get report by tuitionId and month")]
    Store(#[source] StoreError),
}

fn update_failed_message(bucket: &Option<ReportBucket>) -> String {
    match bucket {
        Some(bucket) => format!("Failed to update {} report list", bucket),
        None => "Failed to update report".to_string(),
    }
}
