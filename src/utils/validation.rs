use crate::utils::error::{BillError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BillError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BillError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BillError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BillError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("surcharge_label", "VAT").is_ok());
        assert!(validate_non_empty_string("surcharge_label", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("surcharge_rate", dec!(0.12), dec!(0), dec!(1)).is_ok());
        assert!(validate_range("surcharge_rate", dec!(1.5), dec!(0), dec!(1)).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("rates", "rates.toml").is_ok());
        assert!(validate_path("rates", "").is_err());
        assert!(validate_path("rates", "bad\0path").is_err());
    }
}
