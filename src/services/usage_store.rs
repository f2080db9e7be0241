use crate::db;
use crate::models::{UsageAction, UsageCounter};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("usage counter not found")]
    NotFound,
    #[error("usage store failure: {0}")]
    Database(String),
}

/// Persistence boundary for weekly usage counters. Same seam as the
/// external-service connectors: trait object injected into handlers,
/// swappable for an in-memory table in tests.
#[async_trait::async_trait]
pub trait UsageStore: Send + Sync {
    /// Zero-or-one counter for the key triple
    async fn find(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<Option<UsageCounter>, StoreError>;

    /// Atomic get-or-insert; concurrent callers converge on one row
    async fn fetch_or_create(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<UsageCounter, StoreError>;

    /// Monotonic increment for the action's counter field(s). NotFound when
    /// no row carries this identity.
    async fn apply(&self, id: Uuid, action: UsageAction) -> Result<UsageCounter, StoreError>;
}

/// Postgres-backed store used by the running service
pub struct PgUsageStore {
    pool: PgPool,
}

impl PgUsageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UsageStore for PgUsageStore {
    async fn find(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<Option<UsageCounter>, StoreError> {
        db::usage::fetch(&self.pool, user_id, section, week_start)
            .await
            .map_err(StoreError::Database)
    }

    async fn fetch_or_create(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<UsageCounter, StoreError> {
        db::usage::fetch_or_create(&self.pool, user_id, section, week_start)
            .await
            .map_err(StoreError::Database)
    }

    async fn apply(&self, id: Uuid, action: UsageAction) -> Result<UsageCounter, StoreError> {
        db::usage::increment(&self.pool, id, action)
            .await
            .map_err(StoreError::Database)?
            .ok_or(StoreError::NotFound)
    }
}

/// In-memory store, one table behind a mutex. Backs tests and local runs
/// without Postgres; mirrors the mock-connector pattern.
#[derive(Default)]
pub struct MemoryUsageStore {
    counters: Mutex<HashMap<(String, String, NaiveDate), UsageCounter>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String, NaiveDate), UsageCounter>>, StoreError>
    {
        self.counters
            .lock()
            .map_err(|_| StoreError::Database("usage counter table poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl UsageStore for MemoryUsageStore {
    async fn find(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<Option<UsageCounter>, StoreError> {
        let counters = self.table()?;
        Ok(counters
            .get(&(user_id.to_string(), section.to_string(), week_start))
            .cloned())
    }

    async fn fetch_or_create(
        &self,
        user_id: &str,
        section: &str,
        week_start: NaiveDate,
    ) -> Result<UsageCounter, StoreError> {
        let mut counters = self.table()?;
        let key = (user_id.to_string(), section.to_string(), week_start);
        if let Some(existing) = counters.get(&key) {
            return Ok(existing.clone());
        }

        // seed the lifetime case field from this user+section's prior weeks
        let carried_total = counters
            .values()
            .filter(|c| c.user_id == user_id && c.section == section)
            .map(|c| c.cases_opened_total)
            .max()
            .unwrap_or(0);

        let mut counter = UsageCounter::fresh(user_id, section, week_start);
        counter.cases_opened_total = carried_total;
        counters.insert(key, counter.clone());
        Ok(counter)
    }

    async fn apply(&self, id: Uuid, action: UsageAction) -> Result<UsageCounter, StoreError> {
        let mut counters = self.table()?;
        let counter = counters
            .values_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;

        match action {
            UsageAction::Speech => counter.speech_count += 1,
            UsageAction::CaseOpen => {
                counter.cases_opened_week += 1;
                counter.cases_opened_total += 1;
            }
            UsageAction::Anamnese => counter.anamnese_sessions += 1,
            UsageAction::Aufklaerung => counter.aufklaerung_sessions += 1,
        }
        counter.updated_at = Utc::now();
        Ok(counter.clone())
    }
}
