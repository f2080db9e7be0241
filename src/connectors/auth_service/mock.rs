use super::connector::AuthServiceConnector;
use super::types::UserProfile;
use crate::connectors::errors::ConnectorError;

/// Mock Auth Service for tests and local development.
/// Token convention from the browser dev build: tokens starting with
/// "paid" belong to a running subscription, everything else is free.
pub struct MockAuthServiceConnector;

#[async_trait::async_trait]
impl AuthServiceConnector for MockAuthServiceConnector {
    async fn get_user_profile(&self, bearer_token: &str) -> Result<UserProfile, ConnectorError> {
        if bearer_token.starts_with("paid") {
            Ok(UserProfile {
                id: "mock-paid-user".to_string(),
                email: "arzt@example.com".to_string(),
                account_type: Some("paid_3m".to_string()),
                plan_expiry: None,
            })
        } else {
            Ok(UserProfile {
                id: "mock-free-user".to_string(),
                email: "student@example.com".to_string(),
                account_type: Some("free".to_string()),
                plan_expiry: None,
            })
        }
    }
}
