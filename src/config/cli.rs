use crate::config::toml_config::RateConfig;
use crate::core::registry::RateRegistry;
use crate::domain::model::CustomerClass;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand};
use std::borrow::Cow;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "water-bill")]
#[command(about = "Tiered water bill calculator")]
pub struct CliConfig {
    /// TOML file overriding the built-in rate schedules
    #[arg(long, global = true)]
    pub rates: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute an itemized bill for one reading
    Calculate {
        /// Consumption in cubic meters
        #[arg(short, long, allow_hyphen_values = true)]
        consumption: String,

        #[arg(long = "class", value_enum, default_value_t = CustomerClass::Residential)]
        customer_class: CustomerClass,

        /// Print the bill as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the active rate schedules
    Rates {
        #[arg(long = "class", value_enum)]
        customer_class: Option<CustomerClass>,
    },
    /// Bill every reading in a CSV file and write a CSV summary to stdout
    Batch {
        /// CSV with `account,consumption,customer_class` columns
        #[arg(short, long)]
        input: PathBuf,
    },
}

impl CliConfig {
    /// The registry from `--rates`, or the built-in one.
    pub fn load_registry(&self) -> Result<Cow<'static, RateRegistry>> {
        match &self.rates {
            Some(path) => {
                let registry = RateConfig::from_file(path)?.into_registry()?;
                tracing::info!("Using rate schedules from {}", path.display());
                Ok(Cow::Owned(registry))
            }
            None => Ok(Cow::Borrowed(RateRegistry::builtin())),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.rates {
            validate_path("rates", &path.to_string_lossy())?;
        }
        if let Command::Batch { input } = &self.command {
            validate_path("input", &input.to_string_lossy())?;
        }
        Ok(())
    }
}
