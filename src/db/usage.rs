use crate::models::{UsageAction, UsageCounter};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn fetch(
    pool: &PgPool,
    user_id: &str,
    section: &str,
    week_start: NaiveDate,
) -> Result<Option<UsageCounter>, String> {
    let query_span = tracing::info_span!("Fetching the usage counter by key");
    sqlx::query_as::<_, UsageCounter>(
        r#"
        SELECT *
        FROM usage_counter
        WHERE user_id = $1 AND section = $2 AND week_start = $3
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(section)
    .bind(week_start)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute fetch query: {:?}", err);
        "Internal Server Error".to_string()
    })
}

/// Atomic get-or-insert against the (user_id, section, week_start) unique
/// key. Two concurrent callers both get the same row back. The lifetime
/// case field of a fresh row is seeded from the user+section's prior weeks.
pub async fn fetch_or_create(
    pool: &PgPool,
    user_id: &str,
    section: &str,
    week_start: NaiveDate,
) -> Result<UsageCounter, String> {
    let query_span = tracing::info_span!("Fetching or creating the weekly usage counter");
    sqlx::query_as::<_, UsageCounter>(
        r#"
        INSERT INTO usage_counter
            (id, user_id, section, week_start, speech_count, cases_opened_week,
             cases_opened_total, anamnese_sessions, aufklaerung_sessions,
             created_at, updated_at)
        VALUES
            ($1, $2, $3, $4, 0, 0,
             COALESCE((SELECT MAX(cases_opened_total) FROM usage_counter
                       WHERE user_id = $2 AND section = $3), 0),
             0, 0, NOW(), NOW())
        ON CONFLICT (user_id, section, week_start)
        DO UPDATE SET updated_at = usage_counter.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(section)
    .bind(week_start)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute upsert query: {:?}", err);
        "Internal Server Error".to_string()
    })
}

/// Monotonic increment of the counter field(s) for an action. Returns
/// Ok(None) when the row does not exist; callers treat that as a no-op
/// failure rather than creating a row.
pub async fn increment(
    pool: &PgPool,
    id: Uuid,
    action: UsageAction,
) -> Result<Option<UsageCounter>, String> {
    let query_span = tracing::info_span!("Incrementing the usage counter");
    let query = match action {
        UsageAction::Speech => {
            r#"
            UPDATE usage_counter
            SET speech_count = speech_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
        UsageAction::CaseOpen => {
            r#"
            UPDATE usage_counter
            SET cases_opened_week = cases_opened_week + 1,
                cases_opened_total = cases_opened_total + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
        UsageAction::Anamnese => {
            r#"
            UPDATE usage_counter
            SET anamnese_sessions = anamnese_sessions + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
        UsageAction::Aufklaerung => {
            r#"
            UPDATE usage_counter
            SET aufklaerung_sessions = aufklaerung_sessions + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        }
    };

    sqlx::query_as::<_, UsageCounter>(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute increment query: {:?}", err);
            "Internal Server Error".to_string()
        })
}
