//! External Service Connectors
//!
//! Adapters for everything fsprep talks to over the network. All external
//! integrations go through a connector trait so routes never depend on an
//! HTTP implementation and tests can swap in a mock.
//!
//! Pattern per service: trait in `connector.rs`, reqwest client in
//! `client.rs`, enable/disable gate in `config.rs`, mock fallback in
//! `mock.rs`.

pub mod auth_service;
pub mod config;
pub mod errors;

pub use auth_service::{
    extract_bearer_token, AuthServiceClient, AuthServiceConnector, MockAuthServiceConnector,
    UserProfile,
};
pub use config::{AuthServiceConfig, ConnectorConfig};
pub use errors::ConnectorError;

// Re-export init functions for convenient access
pub use auth_service::init as init_auth_service;
