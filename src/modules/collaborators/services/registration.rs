use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, error};

use super::collaborator_trait::{CollaboratorError, RegistrationClient};
use super::http_client::{build_client, get_data};
use crate::config::CollaboratorConfig;
use crate::core::Result;
use crate::modules::collaborators::models::{TuitionList, TuitionRecord};

const FAILED_TO_GET_TUITION_LIST: &str = "Failed to get tuition list";

/// HTTP client for the registration service
pub struct HttpRegistrationClient {
    client: ClientWithMiddleware,
    tuition_list_url: String,
}

impl HttpRegistrationClient {
    pub fn new(config: &CollaboratorConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            tuition_list_url: config.endpoint(),
        })
    }

    pub fn tuition_list_url(&self) -> &str {
        &self.tuition_list_url
    }
}

#[async_trait]
impl RegistrationClient for HttpRegistrationClient {
    async fn list_tuitions(&self) -> std::result::Result<Vec<TuitionRecord>, CollaboratorError> {
        debug!(url = %self.tuition_list_url, "Calling registration service to get tuition list");

        let list: TuitionList =
            get_data(&self.client, &self.tuition_list_url, FAILED_TO_GET_TUITION_LIST)
                .await
                .map_err(|e| {
                    error!(error = %e, "Registration service call failed");
                    e
                })?;

        debug!(tuitions = list.tuition_list.len(), "Getting tuition list was successful");
        Ok(list.tuition_list)
    }
}
