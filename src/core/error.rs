use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use crate::modules::reports::ReportError;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or malformed request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Month token outside the twelve calendar months
    #[error("Invalid month: '{0}'")]
    InvalidMonth(String),

    /// Reconciliation and report lookup failures
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database operation errors outside of the report store
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AppError {
    /// Numeric application code carried next to the HTTP status in error bodies
    pub fn error_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 4000,
            AppError::InvalidMonth(_) => 4002,
            AppError::Report(err) => match err {
                ReportError::ReportNotFound { .. } => 4001,
                ReportError::PaymentUnavailable { .. } => 5001,
                ReportError::RegistrationUnavailable(_) => 5002,
                ReportError::CreateFailed { .. }
                | ReportError::UpdateFailed { .. }
                | ReportError::Store(_) => 5000,
            },
            _ => 5000,
        }
    }

    /// Upstream response body, if the failure came from a collaborator
    fn upstream_details(&self) -> Option<&str> {
        match self {
            AppError::Report(ReportError::RegistrationUnavailable(source))
            | AppError::Report(ReportError::PaymentUnavailable { source, .. }) => source.body(),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let mut error = serde_json::json!({
            "message": self.to_string(),
            "code": status_code.as_u16(),
            "error_code": self.error_code(),
        });
        if let Some(details) = self.upstream_details() {
            error["details"] = serde_json::Value::String(details.to_string());
        }

        HttpResponse::build(status_code).json(serde_json::json!({ "error": error }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            // collaborator failures are told apart by error_code, not status
            AppError::Report(err) => match err {
                ReportError::ReportNotFound { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }
}
