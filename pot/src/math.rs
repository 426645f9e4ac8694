//! Proportional arithmetic for fees, bid increments and payouts.
//!
//! Products of two amounts can exceed `i128`, so every `x * y / z` is widened
//! to `I256` before dividing. Division truncates toward zero, which is floor
//! division for the non-negative amounts a pot handles.

use soroban_sdk::{Env, I256};

use crate::error::PotError;
use crate::storage::{BPS_DENOMINATOR, PERCENT_DENOMINATOR};

/// `x * y / z` with a 256-bit intermediate.
/// Fails with Overflow when `z` is zero or the quotient does not fit in i128.
pub fn mul_div(env: &Env, x: i128, y: i128, z: i128) -> Result<i128, PotError> {
    if z == 0 {
        return Err(PotError::Overflow);
    }
    weighted(env, x, y)
        .div(&I256::from_i128(env, z))
        .to_i128()
        .ok_or(PotError::Overflow)
}

/// `shares * price` without narrowing.
pub fn weighted(env: &Env, shares: i128, price: i128) -> I256 {
    I256::from_i128(env, shares).mul(&I256::from_i128(env, price))
}

/// `amount * (100 + pct) / 100`
pub fn apply_percentage_increase(env: &Env, amount: i128, pct: u32) -> Result<i128, PotError> {
    let factor = PERCENT_DENOMINATOR
        .checked_add(pct as i128)
        .ok_or(PotError::Overflow)?;
    mul_div(env, amount, factor, PERCENT_DENOMINATOR)
}

/// `amount * bps / 10_000`
pub fn basis_points(env: &Env, amount: i128, bps: u32) -> Result<i128, PotError> {
    mul_div(env, amount, bps as i128, BPS_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_truncates() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 1, 3).unwrap(), 3);
        assert_eq!(mul_div(&env, 2, 1, 3).unwrap(), 0);
        assert_eq!(mul_div(&env, 9, 2, 3).unwrap(), 6);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        let env = Env::default();
        // x * y overflows i128 but the quotient fits
        let x = i128::MAX / 2;
        assert_eq!(mul_div(&env, x, 4, 8).unwrap(), x / 2);
        assert_eq!(mul_div(&env, x, x, x).unwrap(), x);
    }

    #[test]
    fn test_mul_div_zero_divisor() {
        let env = Env::default();
        assert!(matches!(mul_div(&env, 1, 1, 0), Err(PotError::Overflow)));
    }

    #[test]
    fn test_mul_div_quotient_too_large() {
        let env = Env::default();
        let result = mul_div(&env, i128::MAX, 4, 2);
        assert!(matches!(result, Err(PotError::Overflow)));
    }

    #[test]
    fn test_percentage_increase() {
        let env = Env::default();
        // 10% on 3.0 (7 decimals) is 3.3
        assert_eq!(
            apply_percentage_increase(&env, 30_000_000, 10).unwrap(),
            33_000_000
        );
        // 10% on 15 truncates 16.5 down
        assert_eq!(apply_percentage_increase(&env, 15, 10).unwrap(), 16);
        assert_eq!(apply_percentage_increase(&env, 15, 0).unwrap(), 15);
    }

    #[test]
    fn test_basis_points() {
        let env = Env::default();
        // 2.5% of 1000
        assert_eq!(basis_points(&env, 1000, 250).unwrap(), 25);
        // dust truncates to zero
        assert_eq!(basis_points(&env, 39, 250).unwrap(), 0);
        assert_eq!(basis_points(&env, 1000, 10_000).unwrap(), 1000);
    }
}
