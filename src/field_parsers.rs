//! Parsing of numeric fields typed in by the user.
//!
//! Every function returns a `ValidationError` instead of panicking, so the
//! console can report the problem and prompt again.

use crate::error::ValidationError;
use log::debug;

const UNIT_PRICE_FIELD: &str = "unit price";
const QUANTITY_FIELD: &str = "quantity";

/// Parses a whole number, trimming surrounding whitespace.
fn parse_whole_number(field: &'static str, input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    trimmed.parse::<i64>().map_err(|_| {
        debug!("Rejected {field} input '{input}'");
        ValidationError::NotANumber {
            field,
            input: trimmed.to_string(),
        }
    })
}

/// Parses a unit price that must be greater than zero.
pub fn parse_unit_price(input: &str) -> Result<i64, ValidationError> {
    let value = parse_whole_number(UNIT_PRICE_FIELD, input)?;
    if value <= 0 {
        return Err(ValidationError::NonPositivePrice(value));
    }
    Ok(value)
}

/// Parses a quantity that must be greater than zero.
pub fn parse_quantity(input: &str) -> Result<i64, ValidationError> {
    let value = parse_whole_number(QUANTITY_FIELD, input)?;
    if value <= 0 {
        return Err(ValidationError::NonPositiveQuantity(value));
    }
    Ok(value)
}

/// Like [`parse_unit_price`], but blank input means "keep the current value".
pub fn parse_optional_unit_price(input: &str) -> Result<Option<i64>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_unit_price(input).map(Some)
}

/// Like [`parse_quantity`], but blank input means "keep the current value".
pub fn parse_optional_quantity(input: &str) -> Result<Option<i64>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_quantity(input).map(Some)
}
