use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quota-relevant actions a logged-in user can take inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageAction {
    /// Pronunciation / speaking attempt
    Speech,
    /// Opening a patient case
    CaseOpen,
    /// Anamnesegespräch practice session
    Anamnese,
    /// Aufklärungsgespräch (patient disclosure) practice session
    Aufklaerung,
}

impl UsageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageAction::Speech => "speech",
            UsageAction::CaseOpen => "case_open",
            UsageAction::Anamnese => "anamnese",
            UsageAction::Aufklaerung => "aufklaerung",
        }
    }
}

/// One row per (user, section, week). Created lazily by the first check in
/// a given week; rows from earlier weeks stay around untouched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsageCounter {
    pub id: Uuid,
    pub user_id: String,
    pub section: String,
    /// Monday of the week this row covers
    pub week_start: NaiveDate,
    pub speech_count: i64,
    pub cases_opened_week: i64,
    /// Lifetime cases for this user+section, carried across week rows
    pub cases_opened_total: i64,
    pub anamnese_sessions: i64,
    pub aufklaerung_sessions: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UsageCounter {
    pub fn fresh(user_id: &str, section: &str, week_start: NaiveDate) -> Self {
        let now = Utc::now();
        UsageCounter {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            section: section.to_string(),
            week_start,
            speech_count: 0,
            cases_opened_week: 0,
            cases_opened_total: 0,
            anamnese_sessions: 0,
            aufklaerung_sessions: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
