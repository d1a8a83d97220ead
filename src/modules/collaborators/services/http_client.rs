use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::collaborator_trait::CollaboratorError;
use crate::config::CollaboratorConfig;
use crate::core::Result;

/// Response envelope shared by the registration and payment services
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseWrapper<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub display_message: Option<String>,
}

/// Build a reqwest client that retries transient failures with exponential backoff
pub fn build_client(config: &CollaboratorConfig) -> Result<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// GET `url` and unwrap the `data` field of the response envelope
pub(crate) async fn get_data<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    url: &str,
    context: &'static str,
) -> std::result::Result<T, CollaboratorError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CollaboratorError::Transport { context, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Rejected {
            status: status.as_u16(),
            context,
            body,
        });
    }

    let wrapper: ResponseWrapper<T> = response
        .json()
        .await
        .map_err(|source| CollaboratorError::Decode { context, source })?;

    debug!(
        url = %url,
        status = %status,
        upstream_status = wrapper.status.as_deref().unwrap_or("-"),
        "Collaborator call succeeded"
    );

    Ok(wrapper.data)
}
