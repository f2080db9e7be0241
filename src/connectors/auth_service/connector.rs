use super::types::UserProfile;
use crate::connectors::errors::ConnectorError;

/// Trait for Auth Service integration.
/// Allows mocking in tests and swapping implementations.
#[async_trait::async_trait]
pub trait AuthServiceConnector: Send + Sync {
    /// Fetch the profile behind a bearer token.
    /// Calls GET /api/me; the profile carries account type and plan expiry.
    async fn get_user_profile(&self, bearer_token: &str) -> Result<UserProfile, ConnectorError>;
}
