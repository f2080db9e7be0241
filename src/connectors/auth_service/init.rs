use actix_web::web;
use std::sync::Arc;

use crate::connectors::auth_service::{mock, AuthServiceClient, AuthServiceConnector};
use crate::connectors::config::ConnectorConfig;

/// Initialize the Auth Service connector with config from Settings.
///
/// Returns the configured connector wrapped in web::Data for injection
/// into the Actix app. A disabled connector falls back to the mock, the
/// same backend the browser client develops against.
pub fn init(connector_config: &ConnectorConfig) -> web::Data<Arc<dyn AuthServiceConnector>> {
    let connector: Arc<dyn AuthServiceConnector> = if let Some(auth_config) = connector_config
        .auth_service
        .as_ref()
        .filter(|c| c.enabled)
    {
        tracing::info!("Initializing Auth Service connector: {}", auth_config.base_url);
        Arc::new(AuthServiceClient::new(auth_config.clone()))
    } else {
        tracing::warn!("Auth Service connector disabled - using mock");
        Arc::new(mock::MockAuthServiceConnector)
    };

    web::Data::new(connector)
}
