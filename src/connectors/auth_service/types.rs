use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::connectors::errors::ConnectorError;
use crate::models;

/// User profile as returned by GET /api/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub account_type: Option<String>,
    /// ISO date (YYYY-MM-DD); null for free accounts and non-expiring plans
    #[serde(default)]
    pub plan_expiry: Option<String>,
}

impl TryFrom<UserProfile> for models::User {
    type Error = ConnectorError;

    fn try_from(profile: UserProfile) -> Result<Self, Self::Error> {
        let plan_expiry = match profile.plan_expiry.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| {
                ConnectorError::InvalidResponse(format!("bad plan_expiry '{}': {}", raw, err))
            })?),
            None => None,
        };

        Ok(models::User {
            id: profile.id,
            email: profile.email,
            account_type: profile.account_type,
            plan_expiry,
        })
    }
}
