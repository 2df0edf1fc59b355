//! Test fixtures. **Never use in production.**

use chrono::{DateTime, Duration, Utc};

use crate::TxId;

impl TxId {
    /// Fresh unique id for tests. Production ids come from the host.
    #[must_use]
    pub fn random() -> Self {
        Self::new(uuid::Uuid::now_v7().simple().to_string())
    }
}

/// Fixed commit clock: `2026-01-01T00:00:00Z` plus `seconds`.
#[must_use]
pub fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
        + Duration::seconds(seconds)
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, writing through the
/// test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
