//! Ether amount parsing and formatting.
//!
//! Deposits are entered as decimal ether strings (`"0.05"`) and sent to the
//! contract in wei. Parsing is exact: an amount with more than 18 fractional
//! digits is rejected instead of rounded.

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Number of decimals between ether and wei.
pub const ETHER_DECIMALS: u32 = 18;

fn wei_per_ether() -> U256 {
    U256::from(10u64).pow(U256::from(ETHER_DECIMALS))
}

/// Parses a positive decimal ether amount into wei.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAmount`] if the input is not a plain
/// decimal number, is zero, has more than 18 fractional digits, or is too
/// large to represent.
pub fn parse_ether(input: &str) -> Result<U256, ValidationError> {
    let invalid = |reason| ValidationError::InvalidAmount {
        input: input.to_owned(),
        reason,
    };

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || fraction.is_some_and(|f| !is_digits(f)) {
        return Err(invalid("expected a decimal number such as 0.05"));
    }

    // `Decimal` holds at most 28 digits, so padding zeros are stripped first.
    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    let fraction = fraction.map_or("", |f| f.trim_end_matches('0'));
    if fraction.len() > ETHER_DECIMALS as usize {
        return Err(invalid("more than 18 decimal places"));
    }
    let canonical = if fraction.is_empty() {
        whole.to_owned()
    } else {
        format!("{whole}.{fraction}")
    };

    let amount = Decimal::from_str_exact(&canonical)
        .map_err(|_| invalid("too many significant digits"))?
        .normalize();
    if amount.is_zero() {
        return Err(invalid("must be greater than zero"));
    }
    let scale = amount.scale();

    let mantissa =
        u128::try_from(amount.mantissa()).map_err(|_| invalid("must not be negative"))?;
    let factor = U256::from(10u64).pow(U256::from(ETHER_DECIMALS - scale));
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or_else(|| invalid("too large"))
}

/// Formats a wei amount as a decimal ether string without trailing zeros.
#[must_use]
pub fn format_ether(wei: U256) -> String {
    let unit = wei_per_ether();
    let whole = wei / unit;
    let fraction = wei % unit;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction = fraction.to_string();
    let padded = format!("{fraction:0>18}");
    format!("{whole}.{}", padded.trim_end_matches('0'))
}
