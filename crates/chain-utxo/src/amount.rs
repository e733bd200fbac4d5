use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::UtxoError;

pub const SATS_PER_COIN: u64 = 100_000_000;

/// Convert a coin amount (as JSON numbers arrive) to satoshis, flooring
/// anything past the eighth decimal place.
///
/// The float goes through its shortest round-trip decimal form so that
/// `0.29` becomes exactly 29_000_000 rather than 28_999_999.
pub fn coins_to_sat(coins: f64) -> Result<u64, UtxoError> {
    if !coins.is_finite() {
        return Err(UtxoError::InvalidAmount(format!("{coins} is not a finite number")));
    }
    if coins < 0.0 {
        return Err(UtxoError::InvalidAmount(format!("{coins} is negative")));
    }
    let value = Decimal::from_str(&coins.to_string())
        .map_err(|e| UtxoError::InvalidAmount(format!("{coins}: {e}")))?;
    decimal_to_sat(value)
}

fn decimal_to_sat(coins: Decimal) -> Result<u64, UtxoError> {
    coins
        .checked_mul(Decimal::from(SATS_PER_COIN))
        .map(|sats| sats.round_dp_with_strategy(0, RoundingStrategy::ToZero))
        .and_then(|sats| sats.to_u64())
        .ok_or_else(|| UtxoError::InvalidAmount(format!("{coins} is out of range")))
}

pub fn sat_to_coins(sat: u64) -> Decimal {
    Decimal::from(sat) / Decimal::from(SATS_PER_COIN)
}

/// Eight-decimal coin string with trailing zeros trimmed.
pub fn sat_to_coins_string(sat: u64) -> String {
    sat_to_coins(sat).normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_fractional_coins() {
        assert_eq!(coins_to_sat(1.0).unwrap(), SATS_PER_COIN);
        assert_eq!(coins_to_sat(0.5).unwrap(), 50_000_000);
        assert_eq!(coins_to_sat(0.00000001).unwrap(), 1);
    }

    #[test]
    fn binary_float_noise_does_not_lose_a_satoshi() {
        assert_eq!(coins_to_sat(0.29).unwrap(), 29_000_000);
        assert_eq!(coins_to_sat(1.15).unwrap(), 115_000_000);
    }

    #[test]
    fn extra_precision_is_floored() {
        assert_eq!(coins_to_sat(0.123456789).unwrap(), 12_345_678);
        assert_eq!(coins_to_sat(0.999999999).unwrap(), 99_999_999);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(coins_to_sat(-1.0).is_err());
        assert!(coins_to_sat(f64::NAN).is_err());
        assert!(coins_to_sat(f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_values_beyond_u64() {
        assert!(coins_to_sat(1e10).is_ok());
        assert!(coins_to_sat(1e12).is_err());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(sat_to_coins_string(150_000_000), "1.5");
        assert_eq!(sat_to_coins_string(1), "0.00000001");
        assert_eq!(sat_to_coins_string(0), "0");
        assert_eq!(sat_to_coins_string(2 * SATS_PER_COIN), "2");
    }
}
