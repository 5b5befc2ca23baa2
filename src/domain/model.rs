use crate::utils::error::BillError;
use crate::utils::format::{format_peso, format_quantity};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CustomerClass {
    Residential,
    Commercial,
}

impl CustomerClass {
    pub const ALL: [CustomerClass; 2] = [CustomerClass::Residential, CustomerClass::Commercial];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerClass::Residential => "residential",
            CustomerClass::Commercial => "commercial",
        }
    }
}

impl fmt::Display for CustomerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerClass {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(CustomerClass::Residential),
            "commercial" => Ok(CustomerClass::Commercial),
            _ => Err(BillError::UnknownCustomerClass {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeMode {
    /// Flat amount once the bracket is reached, however little of it is used.
    Fixed,
    PerUnit,
}

/// One bracket of a progressive schedule. `upper_bound = None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub lower_bound: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
    pub charge_mode: ChargeMode,
    pub rate: Decimal,
    pub label: String,
}

impl TierRule {
    pub fn is_reached_by(&self, consumption: Decimal) -> bool {
        consumption > self.lower_bound
    }

    /// True when no consumption spills past this bracket.
    pub fn covers(&self, consumption: Decimal) -> bool {
        self.upper_bound.map_or(true, |upper| consumption <= upper)
    }

    /// Units of `consumption` falling inside this bracket.
    pub fn units_within(&self, consumption: Decimal) -> Decimal {
        if !self.is_reached_by(consumption) {
            return Decimal::ZERO;
        }
        let top = match self.upper_bound {
            Some(upper) => consumption.min(upper),
            None => consumption,
        };
        top - self.lower_bound
    }

    pub fn charge_for(&self, consumption: Decimal) -> Decimal {
        if !self.is_reached_by(consumption) {
            return Decimal::ZERO;
        }
        match self.charge_mode {
            ChargeMode::Fixed => self.rate,
            ChargeMode::PerUnit => self.units_within(consumption) * self.rate,
        }
    }

    /// `0-10`, `10-20`, `30+`
    pub fn range_text(&self) -> String {
        match self.upper_bound {
            Some(upper) => format!(
                "{}-{}",
                format_quantity(self.lower_bound),
                format_quantity(upper)
            ),
            None => format!("{}+", format_quantity(self.lower_bound)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub customer_class: CustomerClass,
    pub base_fee: Decimal,
    pub tiers: Vec<TierRule>,
    pub surcharge_rate: Decimal,
    pub surcharge_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillLineItem {
    pub label: String,
    pub amount: Decimal,
    pub description: String,
}

/// Units and charge attributed to one reached bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCharge {
    pub label: String,
    pub units: Decimal,
    pub amount: Decimal,
}

/// Raw consumption as handed over by a caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumptionInput {
    Text(String),
    Float(f64),
    Exact(Decimal),
}

impl From<&str> for ConsumptionInput {
    fn from(value: &str) -> Self {
        ConsumptionInput::Text(value.to_string())
    }
}

impl From<String> for ConsumptionInput {
    fn from(value: String) -> Self {
        ConsumptionInput::Text(value)
    }
}

impl From<f64> for ConsumptionInput {
    fn from(value: f64) -> Self {
        ConsumptionInput::Float(value)
    }
}

impl From<i32> for ConsumptionInput {
    fn from(value: i32) -> Self {
        ConsumptionInput::Exact(Decimal::from(value))
    }
}

impl From<i64> for ConsumptionInput {
    fn from(value: i64) -> Self {
        ConsumptionInput::Exact(Decimal::from(value))
    }
}

impl From<Decimal> for ConsumptionInput {
    fn from(value: Decimal) -> Self {
        ConsumptionInput::Exact(value)
    }
}

impl fmt::Display for ConsumptionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionInput::Text(text) => write!(f, "{:?}", text),
            ConsumptionInput::Float(value) => write!(f, "{}", value),
            ConsumptionInput::Exact(value) => write!(f, "{}", value),
        }
    }
}

/// A computed bill. Built once by the engine and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillResult {
    consumption: Decimal,
    customer_class: CustomerClass,
    line_items: Vec<BillLineItem>,
    tier_charges: Vec<TierCharge>,
    subtotal: Decimal,
    surcharge: Decimal,
    total_due: Decimal,
    computed_at: DateTime<Utc>,
    due_date: NaiveDate,
}

impl BillResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        consumption: Decimal,
        customer_class: CustomerClass,
        line_items: Vec<BillLineItem>,
        tier_charges: Vec<TierCharge>,
        subtotal: Decimal,
        surcharge: Decimal,
        total_due: Decimal,
        computed_at: DateTime<Utc>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            consumption,
            customer_class,
            line_items,
            tier_charges,
            subtotal,
            surcharge,
            total_due,
            computed_at,
            due_date,
        }
    }

    pub fn consumption(&self) -> Decimal {
        self.consumption
    }

    pub fn customer_class(&self) -> CustomerClass {
        self.customer_class
    }

    pub fn line_items(&self) -> &[BillLineItem] {
        &self.line_items
    }

    pub fn tier_charges(&self) -> &[TierCharge] {
        &self.tier_charges
    }

    /// Pre-surcharge subtotal, rounded for display.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn surcharge(&self) -> Decimal {
        self.surcharge
    }

    pub fn total_due(&self) -> Decimal {
        self.total_due
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Sum of the units attributed to each reached bracket.
    pub fn units_billed(&self) -> Decimal {
        self.tier_charges.iter().map(|t| t.units).sum()
    }

    /// One `label: amount` line per item, e.g. `Base Fee: ₱120.00`.
    pub fn breakdown(&self) -> Vec<String> {
        self.line_items
            .iter()
            .map(|item| format!("{}: {}", item.label, format_peso(item.amount)))
            .collect()
    }
}
