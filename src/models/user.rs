use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User record as delivered by the Auth Service. Read-only on our side;
/// the Auth Service owns account type and expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Raw plan code (`free`, `paid_1m`, `paid_3m`); absent for accounts
    /// that never went through checkout
    pub account_type: Option<String>,
    /// End of the paid period; a paid plan without an expiry never expires
    pub plan_expiry: Option<NaiveDate>,
}
