//! Subscription entitlement evaluation: weekly usage windows, effective
//! tier resolution and the allow/deny decision for quota-limited actions.
//!
//! A check always precedes its increment and establishes the week's
//! counter row; the increment only touches a row that already exists.

use crate::models::{AccountType, PlanLimits, UnknownAccountType, UsageAction, UsageCounter, User};
use crate::services::usage_store::{StoreError, UsageStore};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Monday of the week `today` falls in. Monday is the week start
/// regardless of locale; Sunday maps back six days.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let days_from_monday = today.weekday().num_days_from_monday() as i64;
    today - Duration::days(days_from_monday)
}

/// Tier the user is actually entitled to right now. Absent user, expired
/// plan and unset account type all resolve to `Free`; a plan without an
/// expiry never expires. An unrecognised account type is an error, never
/// a silent downgrade or upgrade.
pub fn effective_tier(
    user: Option<&User>,
    today: NaiveDate,
) -> Result<AccountType, UnknownAccountType> {
    let Some(user) = user else {
        return Ok(AccountType::Free);
    };

    if let Some(expiry) = user.plan_expiry {
        if expiry < today {
            return Ok(AccountType::Free);
        }
    }

    match user.account_type.as_deref() {
        None => Ok(AccountType::Free),
        Some(raw) => raw.parse(),
    }
}

/// Machine-checkable denial reasons; `code()` is stable for clients,
/// `Display` is the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoSession,
    SpeechLimit,
    CaseLimit,
    AnamneseLimit,
    AufklaerungLimit,
    CheckFailed,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NoSession => "no_session",
            DenyReason::SpeechLimit => "weekly_speech_limit_reached",
            DenyReason::CaseLimit => "case_limit_reached",
            DenyReason::AnamneseLimit => "anamnese_limit_reached",
            DenyReason::AufklaerungLimit => "aufklaerung_limit_reached",
            DenyReason::CheckFailed => "usage_check_failed",
        }
    }

    pub fn http_code(&self) -> u32 {
        match self {
            DenyReason::NoSession => 401,
            DenyReason::CheckFailed => 500,
            _ => 403,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenyReason::NoSession => "no active session",
            DenyReason::SpeechLimit => "weekly speech limit reached",
            DenyReason::CaseLimit => "case limit reached",
            DenyReason::AnamneseLimit => "anamnese session limit reached",
            DenyReason::AufklaerungLimit => "aufklaerung session limit reached",
            DenyReason::CheckFailed => "usage check failed",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug)]
pub struct UsageDecision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
    pub counter: Option<UsageCounter>,
}

impl UsageDecision {
    fn allow(counter: UsageCounter) -> Self {
        UsageDecision {
            allowed: true,
            reason: None,
            counter: Some(counter),
        }
    }

    fn deny(reason: DenyReason, counter: Option<UsageCounter>) -> Self {
        UsageDecision {
            allowed: false,
            reason: Some(reason),
            counter,
        }
    }
}

/// Decide whether the user may perform `action` in `section` this week.
/// Establishes the week's counter row as a side effect (atomic upsert at
/// the store). Denies conservatively on every failure; a store error is
/// never an allow.
pub async fn check_usage(
    store: &dyn UsageStore,
    user: Option<&User>,
    section: &str,
    action: UsageAction,
    today: NaiveDate,
) -> UsageDecision {
    let Some(user) = user else {
        return UsageDecision::deny(DenyReason::NoSession, None);
    };

    let tier = match effective_tier(Some(user), today) {
        Ok(tier) => tier,
        Err(err) => {
            tracing::error!("Account type of user {} is invalid: {}", user.id, err);
            return UsageDecision::deny(DenyReason::CheckFailed, None);
        }
    };
    let limits = PlanLimits::for_tier(tier);

    let counter = match store
        .fetch_or_create(&user.id, section, week_start(today))
        .await
    {
        Ok(counter) => counter,
        Err(err) => {
            tracing::error!(
                "Usage counter lookup failed for user {} in {}: {}",
                user.id,
                section,
                err
            );
            return UsageDecision::deny(DenyReason::CheckFailed, None);
        }
    };

    if tier.is_paid() {
        return UsageDecision::allow(counter);
    }

    let over = |count: i64, limit: Option<i64>| limit.map_or(false, |l| count >= l);
    let reason = match action {
        UsageAction::Speech if over(counter.speech_count, limits.weekly_speech_per_section) => {
            Some(DenyReason::SpeechLimit)
        }
        UsageAction::CaseOpen if over(counter.cases_opened_total, limits.cases_per_system) => {
            Some(DenyReason::CaseLimit)
        }
        UsageAction::Anamnese
            if over(counter.anamnese_sessions, limits.anamnese_sessions_per_week) =>
        {
            Some(DenyReason::AnamneseLimit)
        }
        UsageAction::Aufklaerung
            if over(
                counter.aufklaerung_sessions,
                limits.aufklaerung_sessions_per_week,
            ) =>
        {
            Some(DenyReason::AufklaerungLimit)
        }
        _ => None,
    };

    match reason {
        Some(reason) => UsageDecision::deny(reason, Some(counter)),
        None => UsageDecision::allow(counter),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// No counter row exists for the current week; the increment is a
    /// no-op because a check is expected to have created the row
    #[error("no usage counter exists for the current week")]
    NoCounter,
    #[error(transparent)]
    Store(StoreError),
}

/// Record a performed action against the current week's counter.
/// Monotonic: fields only grow within their window.
pub async fn record_usage(
    store: &dyn UsageStore,
    user: &User,
    section: &str,
    action: UsageAction,
    today: NaiveDate,
) -> Result<UsageCounter, RecordError> {
    let counter = store
        .find(&user.id, section, week_start(today))
        .await
        .map_err(RecordError::Store)?
        .ok_or(RecordError::NoCounter)?;

    store.apply(counter.id, action).await.map_err(|err| {
        tracing::error!(
            "Failed to increment usage for user {} in {}: {}",
            user.id,
            section,
            err
        );
        match err {
            StoreError::NotFound => RecordError::NoCounter,
            other => RecordError::Store(other),
        }
    })
}

#[cfg(test)]
mod tests;
