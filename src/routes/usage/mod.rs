mod check;
mod record;

pub use check::*;
pub use record::*;

use crate::connectors::{extract_bearer_token, AuthServiceConnector};
use crate::models::User;
use actix_web::HttpRequest;

/// Resolve the request's bearer token to a user via the Auth Service.
/// Anything that goes wrong resolves to "no user" - the entitlement
/// check turns that into a denial, never an allow.
pub(crate) async fn resolve_user(
    req: &HttpRequest,
    connector: &dyn AuthServiceConnector,
) -> Option<User> {
    let token = extract_bearer_token(req)?;
    match connector.get_user_profile(&token).await {
        Ok(profile) => match User::try_from(profile) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("Auth Service returned an unusable profile: {:?}", err);
                None
            }
        },
        Err(err) => {
            tracing::warn!("Auth Service lookup failed: {:?}", err);
            None
        }
    }
}
