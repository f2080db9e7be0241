use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tiers sold through checkout. Closed set: anything else
/// coming back from the Auth Service is a data error, not a new tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "paid_1m")]
    Paid1m,
    #[serde(rename = "paid_3m")]
    Paid3m,
}

impl AccountType {
    pub fn is_paid(&self) -> bool {
        !matches!(self, AccountType::Free)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Free => "free",
            AccountType::Paid1m => "paid_1m",
            AccountType::Paid3m => "paid_3m",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognised account type '{0}'")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "free" => Ok(AccountType::Free),
            "paid_1m" => Ok(AccountType::Paid1m),
            "paid_3m" => Ok(AccountType::Paid3m),
            other => Err(UnknownAccountType(other.to_string())),
        }
    }
}

/// Per-tier allowances. `None` means unlimited.
#[derive(Debug, Clone, Serialize)]
pub struct PlanLimits {
    /// Speech attempts per exam section per week
    pub weekly_speech_per_section: Option<i64>,
    /// Patient cases per organ system, lifetime
    pub cases_per_system: Option<i64>,
    pub anamnese_sessions_per_week: Option<i64>,
    pub aufklaerung_sessions_per_week: Option<i64>,
    pub exam_simulation: bool,
    pub audio_playback: bool,
    pub xp_cap: Option<i64>,
}

const FREE_LIMITS: PlanLimits = PlanLimits {
    weekly_speech_per_section: Some(3),
    cases_per_system: Some(5),
    anamnese_sessions_per_week: Some(1),
    aufklaerung_sessions_per_week: Some(1),
    exam_simulation: false,
    audio_playback: true,
    xp_cap: Some(500),
};

const PAID_LIMITS: PlanLimits = PlanLimits {
    weekly_speech_per_section: None,
    cases_per_system: None,
    anamnese_sessions_per_week: None,
    aufklaerung_sessions_per_week: None,
    exam_simulation: true,
    audio_playback: true,
    xp_cap: None,
};

impl PlanLimits {
    /// Limits table lookup; exhaustive over the closed tier set.
    pub fn for_tier(tier: AccountType) -> &'static PlanLimits {
        match tier {
            AccountType::Free => &FREE_LIMITS,
            AccountType::Paid1m | AccountType::Paid3m => &PAID_LIMITS,
        }
    }
}

/// Catalogue entry for the public `/plans` listing
#[derive(Debug, Clone, Serialize)]
pub struct PlanDefinition {
    pub code: AccountType,
    pub name: &'static str,
    pub period_months: Option<u32>,
    pub limits: PlanLimits,
}

lazy_static::lazy_static! {
    pub static ref PLAN_CATALOGUE: Vec<PlanDefinition> = vec![
        PlanDefinition {
            code: AccountType::Free,
            name: "Free",
            period_months: None,
            limits: FREE_LIMITS.clone(),
        },
        PlanDefinition {
            code: AccountType::Paid1m,
            name: "FSP Intensiv (1 Monat)",
            period_months: Some(1),
            limits: PAID_LIMITS.clone(),
        },
        PlanDefinition {
            code: AccountType::Paid3m,
            name: "FSP Intensiv (3 Monate)",
            period_months: Some(3),
            limits: PAID_LIMITS.clone(),
        },
    ];
}
