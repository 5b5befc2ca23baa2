pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::toml_config::RateConfig;
pub use crate::core::{
    batch::{BatchRunner, BatchSummary},
    engine::{compute_bill, BillingEngine},
    registry::RateRegistry,
};
pub use crate::domain::model::{
    BillLineItem, BillResult, ChargeMode, ConsumptionInput, CustomerClass, RateSchedule,
    TierCharge, TierRule,
};
pub use crate::utils::error::{BillError, Result, ValidationError, ValidationErrorKind};
