use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, error};

use super::collaborator_trait::{CollaboratorError, PaymentClient};
use super::http_client::{build_client, get_data};
use crate::config::CollaboratorConfig;
use crate::core::{AppError, Month, Result};
use crate::modules::collaborators::models::PaidStudents;

const FAILED_TO_GET_PAID_STUDENTS: &str = "Failed to get paid students";

/// HTTP client for the payment service.
///
/// The endpoint path may contain `{tuitionId}` and `{month}` segments. Filled
/// values are percent-encoded as single path segments.
pub struct HttpPaymentClient {
    client: ClientWithMiddleware,
    base_url: Url,
    path_segments: Vec<String>,
}

impl HttpPaymentClient {
    pub fn new(config: &CollaboratorConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid payment base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Payment base URL {} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client: build_client(config)?,
            base_url,
            path_segments: config
                .path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn paid_students_url(&self, tuition_id: &str, month: Month) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in &self.path_segments {
                segments.push(match segment.as_str() {
                    "{tuitionId}" => tuition_id,
                    "{month}" => month.as_str(),
                    literal => literal,
                });
            }
        }
        url
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn get_paid_students(
        &self,
        tuition_id: &str,
        month: Month,
    ) -> std::result::Result<HashSet<String>, CollaboratorError> {
        let url = self.paid_students_url(tuition_id, month);
        debug!(url = %url, tuition_id = %tuition_id, month = %month, "Calling payment service to get paid students");

        let paid: PaidStudents = get_data(&self.client, url.as_str(), FAILED_TO_GET_PAID_STUDENTS)
            .await
            .map_err(|e| {
                error!(error = %e, tuition_id = %tuition_id, month = %month, "Payment service call failed");
                e
            })?;

        Ok(paid.student_ids.into_iter().collect())
    }
}
