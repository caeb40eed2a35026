//! Discounts
//!
//! Order-level discounts computed over the cart lines, and the rounding rules they share.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{MoneyError, iso::Currency};
use thiserror::Error;

pub mod tiered;

pub use tiered::{DiscountPolicy, DiscountResult, compute_discount};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Apply `percent` to an amount given in minor units, rounding the result to whole major units
/// (no fractional currency) and returning it in minor units again.
///
/// Halves round away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_whole_units(
    percent: &Percentage,
    minor: i64,
    currency: &Currency,
) -> Result<i64, DiscountError> {
    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or(DiscountError::PercentConversion)?;

    let major = Decimal::from(minor)
        .checked_div(scale)
        .ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(major)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(scale)
        .ok_or(DiscountError::PercentConversion)?
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
