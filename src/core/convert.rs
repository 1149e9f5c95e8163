//! Amount parsing and the conversion arithmetic

use crate::core::error::{ConversionError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Fractional digits shown for converted amounts.
pub const DISPLAY_PRECISION: u32 = 2;

/// Parses user input into a non-negative amount.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::EmptyAmount);
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|_| ConversionError::InvalidAmount(trimmed.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConversionError::InvalidAmount(trimmed.to_string()));
    }
    Ok(amount)
}

/// `amount * rate`, rounded half away from zero to two places.
pub fn convert(amount: Decimal, rate: Decimal) -> Result<Decimal> {
    amount
        .checked_mul(rate)
        .map(|value| {
            value.round_dp_with_strategy(DISPLAY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        })
        .ok_or(ConversionError::AmountTooLarge)
}

pub fn format_amount(value: Decimal) -> String {
    format!("{:.prec$}", value, prec = DISPLAY_PRECISION as usize)
}
