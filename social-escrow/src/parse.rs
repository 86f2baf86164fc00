//! Strict parsers for user-supplied values.
//!
//! There is exactly one parser per value domain. Integers accept plain
//! decimal (`42`) or `0x`-prefixed hex (`0x2a`); anything else, including
//! signs, whitespace, separators and values that do not fit the target width,
//! is rejected rather than coerced.

use std::sync::LazyLock;

use alloy_primitives::{Address, U256};
use regex::Regex;

use crate::error::ValidationError;

static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Decimal,
    Hex,
}

/// Parses an account address.
///
/// The input must be `0x` followed by exactly 40 hex characters. Mixed case is
/// accepted and the EIP-55 checksum is not enforced.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAddress`] for any other input.
pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    if !ADDRESS_PATTERN.is_match(input) {
        return Err(ValidationError::InvalidAddress(input.to_owned()));
    }
    input
        .parse()
        .map_err(|_| ValidationError::InvalidAddress(input.to_owned()))
}

/// Parses an unsigned 8-bit integer.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInteger`] on malformed input or overflow.
pub fn parse_u8(input: &str) -> Result<u8, ValidationError> {
    const KIND: &str = "uint8";
    let (digits, radix) = split_radix(input, KIND)?;
    let parsed = match radix {
        Radix::Decimal => u8::from_str_radix(digits, 10),
        Radix::Hex => u8::from_str_radix(digits, 16),
    };
    parsed.map_err(|_| out_of_range(input, KIND))
}

/// Parses an unsigned 64-bit integer.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInteger`] on malformed input or overflow.
pub fn parse_u64(input: &str) -> Result<u64, ValidationError> {
    const KIND: &str = "uint64";
    let (digits, radix) = split_radix(input, KIND)?;
    let parsed = match radix {
        Radix::Decimal => u64::from_str_radix(digits, 10),
        Radix::Hex => u64::from_str_radix(digits, 16),
    };
    parsed.map_err(|_| out_of_range(input, KIND))
}

/// Parses an unsigned 256-bit integer.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInteger`] on malformed input or overflow.
pub fn parse_u256(input: &str) -> Result<U256, ValidationError> {
    const KIND: &str = "uint256";
    let (digits, radix) = split_radix(input, KIND)?;
    let parsed = match radix {
        Radix::Decimal => U256::from_str_radix(digits, 10),
        Radix::Hex => U256::from_str_radix(digits, 16),
    };
    parsed.map_err(|_| out_of_range(input, KIND))
}

/// Splits off an optional `0x` prefix and checks every remaining character
/// is a digit of the detected radix.
fn split_radix<'a>(
    input: &'a str,
    kind: &'static str,
) -> Result<(&'a str, Radix), ValidationError> {
    let (digits, radix) = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => (hex, Radix::Hex),
        None => (input, Radix::Decimal),
    };
    if digits.is_empty() {
        return Err(ValidationError::InvalidInteger {
            kind,
            input: input.to_owned(),
            reason: "no digits",
        });
    }
    let well_formed = match radix {
        Radix::Decimal => digits.bytes().all(|b| b.is_ascii_digit()),
        Radix::Hex => digits.bytes().all(|b| b.is_ascii_hexdigit()),
    };
    if !well_formed {
        return Err(ValidationError::InvalidInteger {
            kind,
            input: input.to_owned(),
            reason: "unexpected character",
        });
    }
    Ok((digits, radix))
}

fn out_of_range(input: &str, kind: &'static str) -> ValidationError {
    ValidationError::InvalidInteger {
        kind,
        input: input.to_owned(),
        reason: "out of range",
    }
}
