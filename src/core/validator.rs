use crate::domain::model::ConsumptionInput;
use crate::utils::error::{ValidationError, ValidationErrorKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Readings above this are treated as data-entry mistakes.
pub const MAX_CONSUMPTION: Decimal = dec!(1000);

/// Smallest positive reading a `Decimal` can carry (28 places). Positive input
/// finer than this is billed as this value rather than rounding to zero.
pub const MIN_READING: Decimal = dec!(0.0000000000000000000000000001);

/// Checks a raw reading and returns it as an exact decimal.
///
/// Rules apply in order: numeric and finite, strictly positive, at most
/// [`MAX_CONSUMPTION`]. The first failing rule decides the error kind.
pub fn validate(input: &ConsumptionInput) -> Result<Decimal, ValidationError> {
    let value = match input {
        ConsumptionInput::Text(text) => parse_text(text)?,
        ConsumptionInput::Float(value) => from_float(*value)?,
        ConsumptionInput::Exact(value) => *value,
    };
    check_bounds(value)
}

fn not_numeric(raw: impl std::fmt::Display) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::NotNumeric,
        format!(
            "Please enter a valid consumption amount (got {}); it must be a number",
            raw
        ),
    )
}

fn non_positive() -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::NonPositive,
        "Please enter a valid consumption amount (greater than 0)",
    )
}

fn out_of_range() -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::OutOfRange,
        format!(
            "Consumption seems too high (above {} cu.m). Please verify your input.",
            MAX_CONSUMPTION
        ),
    )
}

fn parse_text(text: &str) -> Result<Decimal, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(not_numeric("an empty value"));
    }

    let positive = is_positive_literal(trimmed);

    let parsed = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed));
    if let Ok(value) = parsed {
        return Ok(keep_positive(value, positive));
    }

    // Beyond what a Decimal can hold; still numeric, so classify by value.
    match trimmed.parse::<f64>() {
        Ok(value) if value == 0.0 && positive => Ok(MIN_READING),
        Ok(value) => from_float(value),
        Err(_) => Err(not_numeric(format!("{:?}", trimmed))),
    }
}

/// Unsigned or `+` text whose mantissa has a non-zero digit.
fn is_positive_literal(text: &str) -> bool {
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    !mantissa.starts_with('-') && mantissa.chars().any(|c| matches!(c, '1'..='9'))
}

fn keep_positive(value: Decimal, positive: bool) -> Decimal {
    if value.is_zero() && positive {
        MIN_READING
    } else {
        value
    }
}

fn from_float(value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(not_numeric(value));
    }
    if value <= 0.0 {
        return Err(non_positive());
    }
    if value > 1000.0 {
        return Err(out_of_range());
    }
    match Decimal::try_from(value) {
        Ok(decimal) => Ok(keep_positive(decimal, true)),
        Err(_) if value < 1.0 => Ok(MIN_READING),
        Err(_) => Err(not_numeric(value)),
    }
}

fn check_bounds(value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(non_positive());
    }
    if value > MAX_CONSUMPTION {
        return Err(out_of_range());
    }
    Ok(value)
}
