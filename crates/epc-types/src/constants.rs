//! System-wide constants for the EPC token ledger.

/// Key prefix for per-account balance records.
pub const BALANCE_KEY_PREFIX: &str = "BAL_";

/// Key prefix for immutable price records.
pub const PRICE_KEY_PREFIX: &str = "PRICE_";

/// Key prefix for transaction log entries.
pub const TX_KEY_PREFIX: &str = "TX_";

/// Key of the supply singleton.
pub const SUPPLY_KEY: &str = "EPC_SUPPLY";

/// Key of the latest-price pointer.
pub const LATEST_PRICE_KEY: &str = "EPC_LATEST_PRICE";

/// Maximum decimal places accepted for token amounts.
pub const DEFAULT_AMOUNT_SCALE: u32 = 8;

/// Maximum decimal places accepted for oracle prices.
pub const DEFAULT_PRICE_SCALE: u32 = 8;

/// Largest scale `rust_decimal` can represent.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// Reason recorded on LOCK entries.
pub const DEFAULT_LOCK_REASON: &str = "trade_lock";

/// Reason recorded on UNLOCK entries.
pub const DEFAULT_UNLOCK_REASON: &str = "trade_unlock";

/// Domain separator for commit digests.
pub const COMMIT_DIGEST_DOMAIN: &[u8] = b"epc:commit:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "EPC Ledger";
