//! Oracle price records.
//!
//! Each observation is stored under `PRICE_{priceId}` and mirrored into the
//! `EPC_LATEST_PRICE` pointer. Historical versions are never deleted.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PriceId, Result, amount};

/// Origin of a price observation.
///
/// Known feeds get their own variant; anything else is carried verbatim.
///
/// The wire form is the feed name, and decoding maps known names back to
/// their variant, so `Other("EIA")` comes back as `Eia`. Equality and
/// hashing go by that name, which keeps the two spellings interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceSource {
    /// U.S. Energy Information Administration.
    Eia,
    /// ENTSO-E transparency platform.
    Entsoe,
    /// Korea Power Exchange.
    Kpx,
    Other(String),
}

impl PriceSource {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eia => "EIA",
            Self::Entsoe => "ENTSOE",
            Self::Kpx => "KPX",
            Self::Other(name) => name,
        }
    }
}

impl PartialEq for PriceSource {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PriceSource {}

impl Hash for PriceSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for PriceSource {
    fn from(name: String) -> Self {
        match name.as_str() {
            "EIA" => Self::Eia,
            "ENTSOE" => Self::Entsoe,
            "KPX" => Self::Kpx,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for PriceSource {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<PriceSource> for String {
    fn from(source: PriceSource) -> Self {
        match source {
            PriceSource::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable price observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub price_id: PriceId,
    pub source: PriceSource,
    /// Raw price as quoted by the source.
    pub price: Decimal,
    /// Currency of `price` (e.g., "USD", "EUR", "KRW").
    pub currency: String,
    /// Weighted basket price that drives the EPC reference price.
    pub basket_price: Decimal,
    /// When the source observed the price.
    pub observed_at: DateTime<Utc>,
    /// Commit time of the operation that recorded it.
    pub recorded_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Check both price fields are positive and within `max_scale`.
    ///
    /// # Errors
    /// Returns `InvalidPrice` naming the first offending field.
    pub fn validate(&self, max_scale: u32) -> Result<()> {
        amount::ensure_identifier("price id", self.price_id.as_str())?;
        amount::ensure_price("price", self.price, max_scale)?;
        amount::ensure_price("basketPrice", self.basket_price, max_scale)
    }
}
