//! Supply aggregate: the singleton stored under `EPC_SUPPLY`.
//!
//! Mathematical invariant enforced on every mutation:
//! ```text
//! total_supply == total_minted - total_burned
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, Result,
    amount::{exact_add, exact_sub},
};

/// Network-wide supply counters plus the last basket price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub total_supply: Decimal,
    pub total_minted: Decimal,
    pub total_burned: Decimal,
    /// Basket price from the most recent `SetPrice`; zero until then.
    pub current_price: Decimal,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Supply {
    /// All counters at zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            total_supply: Decimal::ZERO,
            total_minted: Decimal::ZERO,
            total_burned: Decimal::ZERO,
            current_price: Decimal::ZERO,
            updated_at: None,
        }
    }

    /// Expected supply from the mint/burn history.
    ///
    /// `None` only if the counters themselves are out of range.
    #[must_use]
    pub fn expected_supply(&self) -> Option<Decimal> {
        self.total_minted.checked_sub(self.total_burned)
    }

    /// Whether `total_supply == total_minted - total_burned` holds.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.expected_supply() == Some(self.total_supply) && !self.total_supply.is_sign_negative()
    }

    /// Verify the conservation identity.
    ///
    /// # Errors
    /// Returns [`LedgerError::SupplyInvariantViolation`] if the identity does not hold.
    pub fn verify(&self) -> Result<()> {
        if !self.is_conserved() {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "total supply {} != minted {} - burned {}",
                    self.total_supply, self.total_minted, self.total_burned
                ),
            });
        }
        Ok(())
    }

    /// Record newly minted value.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if a counter cannot hold the exact sum.
    pub fn mint(&mut self, amount: Decimal) -> Result<()> {
        let total_supply = exact_add(self.total_supply, amount, "mint")?;
        let total_minted = exact_add(self.total_minted, amount, "mint")?;
        self.total_supply = total_supply;
        self.total_minted = total_minted;
        Ok(())
    }

    /// Record burned value. Does not look at any account.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` if more would be burned than exists.
    pub fn burn(&mut self, amount: Decimal) -> Result<()> {
        if amount > self.total_supply {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "burn of {amount} exceeds total supply {}",
                    self.total_supply
                ),
            });
        }
        let total_supply = exact_sub(self.total_supply, amount, "burn")?;
        let total_burned = exact_add(self.total_burned, amount, "burn")?;
        self.total_supply = total_supply;
        self.total_burned = total_burned;
        Ok(())
    }

    pub fn set_price(&mut self, basket_price: Decimal) {
        self.current_price = basket_price;
    }
}

impl Default for Supply {
    fn default() -> Self {
        Self::zero()
    }
}
