pub mod entitlement;
pub mod usage_store;

pub use entitlement::{
    check_usage, effective_tier, record_usage, week_start, DenyReason, RecordError, UsageDecision,
};
pub use usage_store::{MemoryUsageStore, PgUsageStore, StoreError, UsageStore};
