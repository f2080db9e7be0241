mod client;
mod connector;
mod init;
pub mod mock;
mod types;
mod utils;


pub use client::AuthServiceClient;
pub use connector::AuthServiceConnector;
pub use init::init;
pub use mock::MockAuthServiceConnector;
pub use types::UserProfile;
pub use utils::extract_bearer_token;
