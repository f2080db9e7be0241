use super::*;
use crate::models::UsageAction;
use crate::services::usage_store::MemoryUsageStore;
use chrono::NaiveDate;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn user(account_type: Option<&str>, plan_expiry: Option<NaiveDate>) -> User {
    User {
        id: "u-1".to_string(),
        email: "student@example.com".to_string(),
        account_type: account_type.map(|s| s.to_string()),
        plan_expiry,
    }
}

/// Store that fails every call, for the deny-on-error paths
struct BrokenStore;

#[async_trait::async_trait]
impl UsageStore for BrokenStore {
    async fn find(
        &self,
        _user_id: &str,
        _section: &str,
        _week_start: NaiveDate,
    ) -> Result<Option<UsageCounter>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn fetch_or_create(
        &self,
        _user_id: &str,
        _section: &str,
        _week_start: NaiveDate,
    ) -> Result<UsageCounter, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn apply(&self, _id: Uuid, _action: UsageAction) -> Result<UsageCounter, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }
}

#[test]
fn test_week_start_sunday_maps_back_six_days() {
    // 2026-08-09 is a Sunday
    assert_eq!(week_start(date(2026, 8, 9)), date(2026, 8, 3));
}

#[test]
fn test_week_start_wednesday_maps_back_two_days() {
    // 2026-08-05 is a Wednesday
    assert_eq!(week_start(date(2026, 8, 5)), date(2026, 8, 3));
}

#[test]
fn test_week_start_monday_is_identity() {
    assert_eq!(week_start(date(2026, 8, 3)), date(2026, 8, 3));
}

#[test]
fn test_effective_tier_absent_user_is_free() {
    assert_eq!(
        effective_tier(None, date(2026, 8, 5)).unwrap(),
        AccountType::Free
    );
}

#[test]
fn test_effective_tier_expired_plan_is_free() {
    // expiry one day in the past
    let u = user(Some("paid_1m"), Some(date(2026, 8, 4)));
    assert_eq!(
        effective_tier(Some(&u), date(2026, 8, 5)).unwrap(),
        AccountType::Free
    );
}

#[test]
fn test_effective_tier_future_expiry_keeps_account_type() {
    let u = user(Some("paid_1m"), Some(date(2026, 8, 6)));
    assert_eq!(
        effective_tier(Some(&u), date(2026, 8, 5)).unwrap(),
        AccountType::Paid1m
    );
}

#[test]
fn test_effective_tier_expiry_today_still_counts() {
    // strictly-before comparison: expiry day itself is still paid
    let u = user(Some("paid_3m"), Some(date(2026, 8, 5)));
    assert_eq!(
        effective_tier(Some(&u), date(2026, 8, 5)).unwrap(),
        AccountType::Paid3m
    );
}

#[test]
fn test_effective_tier_no_expiry_never_expires() {
    let u = user(Some("paid_3m"), None);
    assert_eq!(
        effective_tier(Some(&u), date(2030, 1, 1)).unwrap(),
        AccountType::Paid3m
    );
}

#[test]
fn test_effective_tier_unset_account_type_is_free() {
    let u = user(None, None);
    assert_eq!(
        effective_tier(Some(&u), date(2026, 8, 5)).unwrap(),
        AccountType::Free
    );
}

#[test]
fn test_effective_tier_long_expired_plan() {
    let u = user(Some("paid_1m"), Some(date(2024, 1, 1)));
    assert_eq!(
        effective_tier(Some(&u), date(2024, 6, 1)).unwrap(),
        AccountType::Free
    );
}

#[test]
fn test_effective_tier_rejects_unknown_account_type() {
    let u = user(Some("premium"), None);
    assert!(effective_tier(Some(&u), date(2026, 8, 5)).is_err());
}

#[tokio::test]
async fn test_check_without_user_denies_no_session() {
    let store = MemoryUsageStore::new();
    let decision = check_usage(
        &store,
        None,
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DenyReason::NoSession));
    assert_eq!(decision.reason.unwrap().code(), "no_session");
    // no counter is created for anonymous checks
    assert!(store
        .find("u-1", "kardiologie", date(2026, 8, 3))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_first_check_creates_zeroed_counter_and_allows() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let decision = check_usage(
        &store,
        Some(&u),
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await;

    assert!(decision.allowed);
    let counter = decision.counter.unwrap();
    assert_eq!(counter.speech_count, 0);
    assert_eq!(counter.week_start, date(2026, 8, 3));
}

#[tokio::test]
async fn test_check_is_idempotent() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);

    let first = check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    let second = check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;

    let first = first.counter.unwrap();
    let second = second.counter.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.speech_count, 0);
}

#[tokio::test]
async fn test_free_user_hits_weekly_speech_limit() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);
    let limit = PlanLimits::for_tier(AccountType::Free)
        .weekly_speech_per_section
        .unwrap();

    for _ in 0..limit {
        let decision =
            check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
        assert!(decision.allowed);
        record_usage(&store, &u, "kardiologie", UsageAction::Speech, today)
            .await
            .unwrap();
    }

    let denied = check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, Some(DenyReason::SpeechLimit));
    assert_eq!(denied.reason.unwrap().to_string(), "weekly speech limit reached");
    // the counter still comes back with the denial
    assert_eq!(denied.counter.unwrap().speech_count, limit);
}

#[tokio::test]
async fn test_speech_limit_is_per_section() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);
    let limit = PlanLimits::for_tier(AccountType::Free)
        .weekly_speech_per_section
        .unwrap();

    check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    for _ in 0..limit {
        record_usage(&store, &u, "kardiologie", UsageAction::Speech, today)
            .await
            .unwrap();
    }
    assert!(
        !check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today)
            .await
            .allowed
    );

    // a different section still has its full allowance
    let other = check_usage(&store, Some(&u), "pneumologie", UsageAction::Speech, today).await;
    assert!(other.allowed);
}

#[tokio::test]
async fn test_new_week_resets_speech_allowance() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);
    let limit = PlanLimits::for_tier(AccountType::Free)
        .weekly_speech_per_section
        .unwrap();

    check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    for _ in 0..limit {
        record_usage(&store, &u, "kardiologie", UsageAction::Speech, today)
            .await
            .unwrap();
    }
    assert!(
        !check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today)
            .await
            .allowed
    );

    let next_week = today + Duration::days(7);
    let decision = check_usage(
        &store,
        Some(&u),
        "kardiologie",
        UsageAction::Speech,
        next_week,
    )
    .await;
    assert!(decision.allowed);
    assert_eq!(decision.counter.unwrap().speech_count, 0);
}

#[tokio::test]
async fn test_case_limit_is_lifetime_across_weeks() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);
    let limit = PlanLimits::for_tier(AccountType::Free)
        .cases_per_system
        .unwrap();

    check_usage(&store, Some(&u), "kardiologie", UsageAction::CaseOpen, today).await;
    for _ in 0..limit {
        record_usage(&store, &u, "kardiologie", UsageAction::CaseOpen, today)
            .await
            .unwrap();
    }

    // the lifetime count carries into the next week's fresh row
    let next_week = today + Duration::days(7);
    let denied = check_usage(
        &store,
        Some(&u),
        "kardiologie",
        UsageAction::CaseOpen,
        next_week,
    )
    .await;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, Some(DenyReason::CaseLimit));
}

#[tokio::test]
async fn test_anamnese_and_aufklaerung_limits_are_independent() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);

    check_usage(&store, Some(&u), "kardiologie", UsageAction::Anamnese, today).await;
    record_usage(&store, &u, "kardiologie", UsageAction::Anamnese, today)
        .await
        .unwrap();

    let denied = check_usage(&store, Some(&u), "kardiologie", UsageAction::Anamnese, today).await;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, Some(DenyReason::AnamneseLimit));

    // the aufklärung allowance is untouched
    let other = check_usage(
        &store,
        Some(&u),
        "kardiologie",
        UsageAction::Aufklaerung,
        today,
    )
    .await;
    assert!(other.allowed);
}

#[tokio::test]
async fn test_paid_user_never_denied_on_quota() {
    let store = MemoryUsageStore::new();
    let u = user(Some("paid_3m"), None);
    let today = date(2026, 8, 5);

    check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    for _ in 0..50 {
        record_usage(&store, &u, "kardiologie", UsageAction::Speech, today)
            .await
            .unwrap();
    }

    let decision = check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today).await;
    assert!(decision.allowed);
    assert_eq!(decision.counter.unwrap().speech_count, 50);
}

#[tokio::test]
async fn test_expired_paid_user_is_limited_again() {
    let store = MemoryUsageStore::new();
    let u = user(Some("paid_1m"), Some(date(2026, 8, 1)));
    let today = date(2026, 8, 5);

    check_usage(&store, Some(&u), "kardiologie", UsageAction::Anamnese, today).await;
    record_usage(&store, &u, "kardiologie", UsageAction::Anamnese, today)
        .await
        .unwrap();

    let denied = check_usage(&store, Some(&u), "kardiologie", UsageAction::Anamnese, today).await;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, Some(DenyReason::AnamneseLimit));
}

#[tokio::test]
async fn test_unknown_account_type_denies_conservatively() {
    let store = MemoryUsageStore::new();
    let u = user(Some("lifetime"), None);
    let decision = check_usage(
        &store,
        Some(&u),
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DenyReason::CheckFailed));
}

#[tokio::test]
async fn test_store_failure_denies_never_allows() {
    let u = user(Some("paid_3m"), None);
    let decision = check_usage(
        &BrokenStore,
        Some(&u),
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DenyReason::CheckFailed));
    assert_eq!(decision.reason.unwrap().http_code(), 500);
}

#[tokio::test]
async fn test_record_without_counter_is_noop_failure() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let err = record_usage(
        &store,
        &u,
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RecordError::NoCounter));
}

#[tokio::test]
async fn test_record_store_failure_surfaces() {
    let u = user(Some("free"), None);
    let err = record_usage(
        &BrokenStore,
        &u,
        "kardiologie",
        UsageAction::Speech,
        date(2026, 8, 5),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RecordError::Store(_)));
}

#[tokio::test]
async fn test_check_then_record_observe_same_counter() {
    let store = MemoryUsageStore::new();
    let u = user(Some("free"), None);
    let today = date(2026, 8, 5);

    let checked = check_usage(&store, Some(&u), "kardiologie", UsageAction::Speech, today)
        .await
        .counter
        .unwrap();
    let recorded = record_usage(&store, &u, "kardiologie", UsageAction::Speech, today)
        .await
        .unwrap();

    assert_eq!(checked.id, recorded.id);
    assert_eq!(recorded.speech_count, checked.speech_count + 1);
}
