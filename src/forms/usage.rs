use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Body of POST /usage/check and POST /usage/record
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct UsageEvent {
    /// Exam section / organ system key, e.g. "kardiologie"
    #[validate(min_length = 1)]
    #[validate(max_length = 64)]
    pub section: String,
    pub action: models::UsageAction,
}
