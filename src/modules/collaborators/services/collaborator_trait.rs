use std::collections::HashSet;

use async_trait::async_trait;

use crate::core::Month;
use crate::modules::collaborators::models::TuitionRecord;

/// Registration service: source of tuitions and their enrolled students
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    /// Fetch every tuition currently known to the registration service
    async fn list_tuitions(&self) -> Result<Vec<TuitionRecord>, CollaboratorError>;
}

/// Payment service: decides which students have paid
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Students confirmed as paid for `tuition_id` in `month`
    async fn get_paid_students(
        &self,
        tuition_id: &str,
        month: Month,
    ) -> Result<HashSet<String>, CollaboratorError>;
}

/// Failure talking to an upstream collaborator
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// Upstream answered with a non-success status
    #[error("{status} {context}")]
    Rejected {
        status: u16,
        context: &'static str,
        body: String,
    },

    /// Request never produced a response (connect, timeout, retries exhausted)
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// Response body did not match the expected wrapper
    #[error("{context}: invalid response body: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl CollaboratorError {
    /// Raw upstream body for rejected calls
    pub fn body(&self) -> Option<&str> {
        match self {
            CollaboratorError::Rejected { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CollaboratorError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
