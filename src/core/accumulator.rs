use crate::domain::model::{BillLineItem, ChargeMode, RateSchedule, TierCharge, TierRule};
use crate::utils::format::{format_peso, format_quantity, round_money};
use rust_decimal::Decimal;

/// Line items and running totals for the base fee plus every reached tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub line_items: Vec<BillLineItem>,
    pub tier_charges: Vec<TierCharge>,
    /// Unrounded; only reported amounts are rounded.
    pub subtotal: Decimal,
}

/// Walks `schedule.tiers` in order, charging each tier that `consumption`
/// reaches and stopping at the first tier whose upper bound covers it.
pub fn accumulate(consumption: Decimal, schedule: &RateSchedule) -> Accumulation {
    let mut subtotal = schedule.base_fee;
    let mut line_items = vec![BillLineItem {
        label: "Base Fee".to_string(),
        amount: round_money(schedule.base_fee),
        description: "Monthly service charge".to_string(),
    }];
    let mut tier_charges = Vec::with_capacity(schedule.tiers.len());

    for tier in &schedule.tiers {
        if !tier.is_reached_by(consumption) {
            break;
        }

        let units = tier.units_within(consumption);
        let charge = tier.charge_for(consumption);
        subtotal += charge;

        tracing::debug!(
            tier = %tier.label,
            units = %units,
            charge = %charge,
            "Tier reached"
        );

        line_items.push(BillLineItem {
            label: tier.label.clone(),
            amount: round_money(charge),
            description: describe(tier, units),
        });
        tier_charges.push(TierCharge {
            label: tier.label.clone(),
            units,
            amount: round_money(charge),
        });

        if tier.covers(consumption) {
            break;
        }
    }

    Accumulation {
        line_items,
        tier_charges,
        subtotal,
    }
}

fn describe(tier: &TierRule, units: Decimal) -> String {
    match (tier.charge_mode, tier.upper_bound) {
        (ChargeMode::Fixed, Some(upper)) if tier.lower_bound.is_zero() => {
            format!("Fixed rate for first {} cu.m", format_quantity(upper))
        }
        (ChargeMode::Fixed, _) => format!("Fixed rate for {} cu.m", tier.range_text()),
        (ChargeMode::PerUnit, _) => format!(
            "{} cu.m × {}",
            format_quantity(units),
            format_peso(tier.rate)
        ),
    }
}
