use tracing::Instrument;

use super::connector::AuthServiceConnector;
use super::types::UserProfile;
use crate::connectors::config::AuthServiceConfig;
use crate::connectors::errors::ConnectorError;

/// HTTP-based Auth Service client
pub struct AuthServiceClient {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl AuthServiceClient {
    /// Create new Auth Service client
    pub fn new(config: AuthServiceConfig) -> Self {
        let timeout = std::time::Duration::from_secs(config.timeout_secs);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl AuthServiceConnector for AuthServiceClient {
    async fn get_user_profile(&self, bearer_token: &str) -> Result<UserProfile, ConnectorError> {
        let span = tracing::info_span!("auth_service_get_user_profile");

        let url = format!("{}/api/me", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .send()
            .instrument(span)
            .await
            .map_err(ConnectorError::from)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ConnectorError::Unauthorized(
                "bearer token rejected by Auth Service".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::HttpError(format!(
                "Auth Service error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ConnectorError::HttpError(err.to_string()))?;
        serde_json::from_str::<UserProfile>(&text)
            .map_err(|_| ConnectorError::InvalidResponse(text))
    }
}
