use crate::core::registry::RateRegistry;
use crate::domain::model::RateSchedule;
use crate::utils::error::{BillError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}"));

/// Rate-schedule override file.
///
/// ```toml
/// [[schedules]]
/// customer_class = "residential"
/// base_fee = "120.00"
/// surcharge_rate = "0.05"
/// surcharge_label = "Environmental Fee"
///
/// [[schedules.tiers]]
/// lower_bound = "0"
/// upper_bound = "10"
/// charge_mode = "fixed"
/// rate = "180.00"
/// label = "Tier 1 (0-10 cu.m)"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    pub schedules: Vec<RateSchedule>,
}

impl RateConfig {
    /// 從 TOML 檔案載入費率
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        validate_path("rates", &path.to_string_lossy())?;
        let content = std::fs::read_to_string(path).map_err(BillError::IoError)?;
        tracing::debug!("Loaded rate file {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BillError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = ENV_VAR.as_ref().map_err(|e| BillError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Validates and turns the file into the active registry.
    pub fn into_registry(self) -> Result<RateRegistry> {
        RateRegistry::from_schedules(self.schedules)
    }
}

impl Validate for RateConfig {
    fn validate(&self) -> Result<()> {
        RateRegistry::from_schedules(self.schedules.clone()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ChargeMode, CustomerClass};
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COMMERCIAL: &str = r#"
[[schedules]]
customer_class = "commercial"
base_fee = "250.00"
surcharge_rate = "0.12"
surcharge_label = "VAT"

[[schedules.tiers]]
lower_bound = "0"
upper_bound = "20"
charge_mode = "fixed"
rate = "450.00"
label = "Tier 1 (0-20 cu.m)"

[[schedules.tiers]]
lower_bound = "20"
charge_mode = "per_unit"
rate = "40.00"
label = "Tier 2 (21+ cu.m)"
"#;

    fn residential(rate: &str) -> String {
        format!(
            r#"
[[schedules]]
customer_class = "residential"
base_fee = "100.00"
surcharge_rate = "{}"
surcharge_label = "Environmental Fee"

[[schedules.tiers]]
lower_bound = "0"
charge_mode = "per_unit"
rate = "20.00"
label = "Flat per cu.m"
"#,
            rate
        )
    }

    #[test]
    fn test_parse_rate_config() {
        let content = format!("{}{}", residential("0.05"), COMMERCIAL);
        let config = RateConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_ok());

        let registry = config.into_registry().unwrap();
        let commercial = registry.get_schedule(CustomerClass::Commercial);
        assert_eq!(commercial.tiers.len(), 2);
        assert_eq!(commercial.tiers[0].charge_mode, ChargeMode::Fixed);
        assert_eq!(commercial.tiers[1].upper_bound, None);
        assert_eq!(
            registry.get_schedule(CustomerClass::Residential).base_fee,
            dec!(100.00)
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WATER_BILL_TEST_ENV_FEE", "0.07");

        let content = format!("{}{}", residential("${WATER_BILL_TEST_ENV_FEE}"), COMMERCIAL);
        let registry = RateConfig::from_toml_str(&content)
            .unwrap()
            .into_registry()
            .unwrap();
        assert_eq!(
            registry.get_schedule(CustomerClass::Residential).surcharge_rate,
            dec!(0.07)
        );

        std::env::remove_var("WATER_BILL_TEST_ENV_FEE");
    }

    #[test]
    fn test_missing_class_is_rejected() {
        let config = RateConfig::from_toml_str(COMMERCIAL).unwrap();
        assert!(matches!(
            config.into_registry(),
            Err(BillError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = RateConfig::from_toml_str("[[schedules]\nbroken").unwrap_err();
        assert!(matches!(err, BillError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = format!("{}{}", residential("0.05"), COMMERCIAL);
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = RateConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.schedules.len(), 2);
    }
}
