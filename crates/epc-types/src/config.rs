//! Ledger configuration.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result, constants};

/// Tunables for a ledger instance.
///
/// Every replica executing the same operations must run with the same
/// configuration, since it affects validation and the audit entries written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Maximum decimal places accepted for token amounts.
    pub amount_scale: u32,
    /// Maximum decimal places accepted for oracle prices.
    pub price_scale: u32,
    /// Reason recorded on LOCK entries.
    pub lock_reason: String,
    /// Reason recorded on UNLOCK entries.
    pub unlock_reason: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            amount_scale: constants::DEFAULT_AMOUNT_SCALE,
            price_scale: constants::DEFAULT_PRICE_SCALE,
            lock_reason: constants::DEFAULT_LOCK_REASON.to_string(),
            unlock_reason: constants::DEFAULT_UNLOCK_REASON.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the document is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `InvalidConfig` describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.amount_scale > constants::MAX_DECIMAL_SCALE {
            return Err(LedgerError::InvalidConfig(format!(
                "amountScale {} exceeds {}",
                self.amount_scale,
                constants::MAX_DECIMAL_SCALE
            )));
        }
        if self.price_scale > constants::MAX_DECIMAL_SCALE {
            return Err(LedgerError::InvalidConfig(format!(
                "priceScale {} exceeds {}",
                self.price_scale,
                constants::MAX_DECIMAL_SCALE
            )));
        }
        if self.lock_reason.is_empty() || self.unlock_reason.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "lock and unlock reasons must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.amount_scale, 8);
        assert_eq!(cfg.price_scale, 8);
        assert_eq!(cfg.lock_reason, "trade_lock");
        assert_eq!(cfg.unlock_reason, "trade_unlock");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = LedgerConfig::from_json(r#"{"amountScale": 2}"#).unwrap();
        assert_eq!(cfg.amount_scale, 2);
        assert_eq!(cfg.lock_reason, "trade_lock");
    }

    #[test]
    fn out_of_range_scale_rejected() {
        let err = LedgerConfig::from_json(r#"{"priceScale": 40}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = LedgerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfig(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = LedgerConfig {
            lock_reason: "escrow".into(),
            ..LedgerConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LedgerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
