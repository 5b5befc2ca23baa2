use crate::domain::model::{ChargeMode, CustomerClass, RateSchedule, TierRule};
use crate::domain::ports::ScheduleProvider;
use crate::utils::error::{BillError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::LazyLock;

/// Ceiling for any base fee or tier rate. Keeps every charge the engine can
/// produce (rate times at most 1000 units) far inside `Decimal`'s range.
pub const MAX_SCHEDULE_AMOUNT: Decimal = dec!(1000000);

static BUILTIN: LazyLock<RateRegistry> = LazyLock::new(|| RateRegistry {
    residential: residential_schedule(),
    commercial: commercial_schedule(),
});

fn tier(
    lower: Decimal,
    upper: Option<Decimal>,
    charge_mode: ChargeMode,
    rate: Decimal,
    label: &str,
) -> TierRule {
    TierRule {
        lower_bound: lower,
        upper_bound: upper,
        charge_mode,
        rate,
        label: label.to_string(),
    }
}

fn residential_schedule() -> RateSchedule {
    RateSchedule {
        customer_class: CustomerClass::Residential,
        base_fee: dec!(120.00),
        tiers: vec![
            tier(dec!(0), Some(dec!(10)), ChargeMode::Fixed, dec!(180.00), "Tier 1 (0-10 cu.m)"),
            tier(dec!(10), Some(dec!(20)), ChargeMode::PerUnit, dec!(22.50), "Tier 2 (11-20 cu.m)"),
            tier(dec!(20), Some(dec!(30)), ChargeMode::PerUnit, dec!(28.00), "Tier 3 (21-30 cu.m)"),
            tier(dec!(30), None, ChargeMode::PerUnit, dec!(35.00), "Tier 4 (31+ cu.m)"),
        ],
        surcharge_rate: dec!(0.05),
        surcharge_label: "Environmental Fee".to_string(),
    }
}

fn commercial_schedule() -> RateSchedule {
    RateSchedule {
        customer_class: CustomerClass::Commercial,
        base_fee: dec!(250.00),
        tiers: vec![
            tier(dec!(0), Some(dec!(20)), ChargeMode::Fixed, dec!(450.00), "Tier 1 (0-20 cu.m)"),
            tier(dec!(20), Some(dec!(40)), ChargeMode::PerUnit, dec!(40.00), "Tier 2 (21-40 cu.m)"),
            tier(dec!(40), Some(dec!(60)), ChargeMode::PerUnit, dec!(45.00), "Tier 3 (41-60 cu.m)"),
            tier(dec!(60), None, ChargeMode::PerUnit, dec!(50.00), "Tier 4 (61+ cu.m)"),
        ],
        surcharge_rate: dec!(0.12),
        surcharge_label: "VAT".to_string(),
    }
}

/// Holds exactly one schedule per customer class.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRegistry {
    residential: RateSchedule,
    commercial: RateSchedule,
}

impl RateRegistry {
    /// The published schedules, built on first use and shared process-wide.
    pub fn builtin() -> &'static RateRegistry {
        &BUILTIN
    }

    /// Builds a registry from exactly one validated schedule per class.
    pub fn from_schedules(schedules: Vec<RateSchedule>) -> Result<Self> {
        let mut residential = None;
        let mut commercial = None;

        for schedule in schedules {
            schedule.validate()?;
            let slot = match schedule.customer_class {
                CustomerClass::Residential => &mut residential,
                CustomerClass::Commercial => &mut commercial,
            };
            if slot.is_some() {
                return Err(BillError::InvalidConfigValueError {
                    field: "schedules.customer_class".to_string(),
                    value: schedule.customer_class.to_string(),
                    reason: "Only one active schedule per customer class is allowed".to_string(),
                });
            }
            *slot = Some(schedule);
        }

        let residential = residential.ok_or_else(|| BillError::MissingConfigError {
            field: "schedules[residential]".to_string(),
        })?;
        let commercial = commercial.ok_or_else(|| BillError::MissingConfigError {
            field: "schedules[commercial]".to_string(),
        })?;

        Ok(Self {
            residential,
            commercial,
        })
    }

    pub fn get_schedule(&self, customer_class: CustomerClass) -> &RateSchedule {
        match customer_class {
            CustomerClass::Residential => &self.residential,
            CustomerClass::Commercial => &self.commercial,
        }
    }

    pub fn schedules(&self) -> impl Iterator<Item = &RateSchedule> {
        CustomerClass::ALL
            .into_iter()
            .map(move |class| self.get_schedule(class))
    }
}

impl ScheduleProvider for RateRegistry {
    fn schedule(&self, customer_class: CustomerClass) -> &RateSchedule {
        self.get_schedule(customer_class)
    }
}

impl Validate for RateSchedule {
    /// Tiers must start at 0, ascend contiguously and end unbounded.
    fn validate(&self) -> Result<()> {
        let class = self.customer_class;
        validate_range(
            &format!("{}.base_fee", class),
            self.base_fee,
            Decimal::ZERO,
            MAX_SCHEDULE_AMOUNT,
        )?;
        validate_range(
            &format!("{}.surcharge_rate", class),
            self.surcharge_rate,
            Decimal::ZERO,
            Decimal::ONE,
        )?;
        validate_non_empty_string(&format!("{}.surcharge_label", class), &self.surcharge_label)?;

        let first = self.tiers.first().ok_or_else(|| BillError::MissingConfigError {
            field: format!("{}.tiers", class),
        })?;
        if !first.lower_bound.is_zero() {
            return Err(BillError::InvalidConfigValueError {
                field: format!("{}.tiers[0].lower_bound", class),
                value: first.lower_bound.to_string(),
                reason: "The first tier must start at 0".to_string(),
            });
        }

        let last_index = self.tiers.len() - 1;
        for (index, tier) in self.tiers.iter().enumerate() {
            let field = format!("{}.tiers[{}]", class, index);
            validate_non_empty_string(&format!("{}.label", field), &tier.label)?;
            validate_range(
                &format!("{}.rate", field),
                tier.rate,
                Decimal::ZERO,
                MAX_SCHEDULE_AMOUNT,
            )?;

            match (tier.upper_bound, index == last_index) {
                (None, true) => {}
                (None, false) => {
                    return Err(BillError::InvalidConfigValueError {
                        field: format!("{}.upper_bound", field),
                        value: "unbounded".to_string(),
                        reason: "Only the last tier may be unbounded".to_string(),
                    });
                }
                (Some(upper), true) => {
                    return Err(BillError::InvalidConfigValueError {
                        field: format!("{}.upper_bound", field),
                        value: upper.to_string(),
                        reason: "The last tier must be unbounded".to_string(),
                    });
                }
                (Some(upper), false) => {
                    if upper <= tier.lower_bound {
                        return Err(BillError::InvalidConfigValueError {
                            field: format!("{}.upper_bound", field),
                            value: upper.to_string(),
                            reason: format!(
                                "Upper bound must exceed lower bound {}",
                                tier.lower_bound
                            ),
                        });
                    }
                    let next = &self.tiers[index + 1];
                    if next.lower_bound != upper {
                        return Err(BillError::InvalidConfigValueError {
                            field: format!("{}.tiers[{}].lower_bound", class, index + 1),
                            value: next.lower_bound.to_string(),
                            reason: format!(
                                "Tiers must be contiguous; expected {} to follow {}",
                                upper, tier.label
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
