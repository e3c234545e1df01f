//! Decimal helpers for cash and share amounts
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Cash is kept at 2 decimal places, rounded midpoint-away-from-zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ValidationError;

/// Decimal places carried by cash balances and share amounts
pub const CASH_SCALE: u32 = 2;

/// Round a cash amount to ledger precision
pub fn round_cash(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CASH_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate an order quantity: strictly positive, at most 2 decimal places.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    if amount.normalize().scale() > CASH_SCALE {
        return Err(ValidationError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            amount, CASH_SCALE
        )));
    }
    Ok(amount)
}

/// Validate a per-share price: strictly inside (0, 1).
pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        return Err(ValidationError::InvalidPrice(price.to_string()));
    }
    Ok(price)
}

/// Reject orders where either party's cash contribution rounds to zero.
///
/// At `price * amount` the owner's side is rounded to cents and the other
/// side takes the remainder of `amount`; both must be at least one cent.
pub fn validate_notional(amount: Decimal, price: Decimal) -> Result<(), ValidationError> {
    let owner = round_cash(price * amount);
    if owner.is_zero() || owner >= amount {
        return Err(ValidationError::InvalidAmount(format!(
            "{} at {} settles to zero cash on one side",
            amount, price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_cash_midpoint() {
        assert_eq!(round_cash(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_cash(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::from(10)).is_ok());
        assert!(validate_amount(Decimal::new(250, 2)).is_ok());
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::from(-1)).is_err());
        assert!(validate_amount(Decimal::new(1001, 3)).is_err());
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        // 1.500 is still 1.5
        assert!(validate_amount(Decimal::new(1500, 3)).is_ok());
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(Decimal::new(4, 1)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_price(Decimal::ONE).is_err());
        assert!(validate_price(Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn test_notional_rounding_to_zero_rejected() {
        // 0.01 shares at 0.001 would hand the owner a free share
        assert!(validate_notional(Decimal::new(1, 2), Decimal::new(1, 3)).is_err());
        // 0.01 at 0.999 leaves the acceptor paying nothing
        assert!(validate_notional(Decimal::new(1, 2), Decimal::new(999, 3)).is_err());
        assert!(validate_notional(Decimal::new(1, 2), Decimal::new(5, 1)).is_ok());
        assert!(validate_notional(Decimal::from(10), Decimal::new(4, 1)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_accepted_notional_charges_both_sides(cents in 1i64..100_000, bps in 1i64..10_000) {
            let amount = Decimal::new(cents, 2);
            let price = Decimal::new(bps, 4);
            if validate_notional(amount, price).is_ok() {
                let owner = round_cash(price * amount);
                prop_assert!(owner > Decimal::ZERO);
                prop_assert!(amount - owner > Decimal::ZERO);
            }
        }

        #[test]
        fn prop_round_cash_is_idempotent(mantissa in -1_000_000_000i64..1_000_000_000, scale in 0u32..8) {
            let value = Decimal::new(mantissa, scale);
            let once = round_cash(value);
            prop_assert_eq!(once, round_cash(once));
            prop_assert!(once.scale() <= CASH_SCALE);
        }

        #[test]
        fn prop_prices_strictly_between_zero_and_one_accepted(bps in 1i64..10_000) {
            prop_assert!(validate_price(Decimal::new(bps, 4)).is_ok());
        }
    }
}
