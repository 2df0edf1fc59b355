//! Input guards shared by every mutating operation.

use rust_decimal::Decimal;

use crate::{LedgerError, Result};

/// Reject zero and negative amounts.
pub fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount.is_zero() || amount.is_sign_negative() {
        return Err(LedgerError::InvalidAmount { amount });
    }
    Ok(())
}

/// Reject amounts with more significant decimal places than `max_scale`.
///
/// Trailing zeros do not count: `1.500` has scale 1.
pub fn ensure_scale(amount: Decimal, max_scale: u32) -> Result<()> {
    if amount.normalize().scale() > max_scale {
        return Err(LedgerError::AmountPrecision { amount, max_scale });
    }
    Ok(())
}

/// Positive amount within the configured precision.
pub fn ensure_amount(amount: Decimal, max_scale: u32) -> Result<()> {
    ensure_positive(amount)?;
    ensure_scale(amount, max_scale)
}

/// Positive price within the configured precision. `field` names the
/// offending input in the error.
pub fn ensure_price(field: &'static str, value: Decimal, max_scale: u32) -> Result<()> {
    if value.is_zero() || value.is_sign_negative() || value.normalize().scale() > max_scale {
        return Err(LedgerError::InvalidPrice { field, value });
    }
    Ok(())
}

/// `lhs + rhs`, refusing any result that is not exact.
///
/// `Decimal` keeps at most 28 significant digits and rounds the low digits
/// away once a sum needs more. A rounded result is reported as
/// `AmountOverflow` like a sum past the decimal range.
pub fn exact_add(lhs: Decimal, rhs: Decimal, context: &'static str) -> Result<Decimal> {
    let sum = lhs
        .checked_add(rhs)
        .ok_or(LedgerError::AmountOverflow { context })?;
    ensure_exact(sum, lhs, rhs, context)
}

/// `lhs - rhs`, refusing any result that is not exact.
pub fn exact_sub(lhs: Decimal, rhs: Decimal, context: &'static str) -> Result<Decimal> {
    let difference = lhs
        .checked_sub(rhs)
        .ok_or(LedgerError::AmountOverflow { context })?;
    ensure_exact(difference, lhs, rhs, context)
}

// An exact result needs no more places than the finer operand. Rounding
// shows up as a result scale below that.
fn ensure_exact(
    result: Decimal,
    lhs: Decimal,
    rhs: Decimal,
    context: &'static str,
) -> Result<Decimal> {
    let needed = lhs.normalize().scale().max(rhs.normalize().scale());
    if result.scale() < needed {
        return Err(LedgerError::AmountOverflow { context });
    }
    Ok(result)
}

/// Reject empty identifiers.
pub fn ensure_identifier(kind: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(LedgerError::EmptyIdentifier { kind });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amount_accepted() {
        assert!(ensure_positive(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert!(matches!(
            ensure_positive(Decimal::ZERO),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            ensure_positive(Decimal::new(-5, 0)),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn exact_add_keeps_small_sums() {
        let sum = exact_add(Decimal::new(150, 2), Decimal::new(1, 8), "test").unwrap();
        assert_eq!(sum, Decimal::new(150_000_001, 8));
    }

    #[test]
    fn exact_add_rejects_rounded_sum() {
        // 10^21 + 10^-8 needs 30 significant digits.
        let large = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000, 0);
        let dust = Decimal::new(1, 8);
        assert_eq!(
            exact_add(large, dust, "credit"),
            Err(LedgerError::AmountOverflow { context: "credit" })
        );
        assert!(exact_sub(large, dust, "debit").is_err());
    }

    #[test]
    fn exact_add_ignores_operand_trailing_zeros() {
        // 1.000...0 (scale 20) is exactly 1, so adding it to 10^21 loses nothing.
        let large = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000, 0);
        let one = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 20);
        let sum = exact_add(large, one, "credit").unwrap();
        assert_eq!(sum, large + Decimal::ONE);
    }

    #[test]
    fn exact_sub_matches_plain_subtraction() {
        let difference = exact_sub(Decimal::new(100, 0), Decimal::new(2_550, 2), "debit").unwrap();
        assert_eq!(difference, Decimal::new(7_450, 2));
    }

    #[test]
    fn scale_ignores_trailing_zeros() {
        // 1.50000000000 normalizes to 1.5
        assert!(ensure_scale(Decimal::new(150_000_000_000, 11), 2).is_ok());
        assert!(matches!(
            ensure_scale(Decimal::new(1_234, 3), 2),
            Err(LedgerError::AmountPrecision { max_scale: 2, .. })
        ));
    }

    #[test]
    fn price_guard_names_field() {
        let err = ensure_price("basketPrice", Decimal::ZERO, 8).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidPrice {
                field: "basketPrice",
                value: Decimal::ZERO
            }
        );
    }

    #[test]
    fn empty_identifier_rejected() {
        assert!(ensure_identifier("account id", "alice").is_ok());
        assert_eq!(
            ensure_identifier("account id", "").unwrap_err(),
            LedgerError::EmptyIdentifier { kind: "account id" }
        );
    }
}
