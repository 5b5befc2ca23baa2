use crate::domain::model::{BillLineItem, RateSchedule};
use crate::utils::format::{format_percent, round_money};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Surcharge {
    pub line_item: BillLineItem,
    /// Unrounded surcharge amount.
    pub amount: Decimal,
    /// `subtotal + amount`, unrounded.
    pub total: Decimal,
}

pub fn apply_surcharge(subtotal: Decimal, schedule: &RateSchedule) -> Surcharge {
    let amount = subtotal * schedule.surcharge_rate;
    Surcharge {
        line_item: BillLineItem {
            label: schedule.surcharge_label.clone(),
            amount: round_money(amount),
            description: format!("{} of subtotal", format_percent(schedule.surcharge_rate)),
        },
        amount,
        total: subtotal + amount,
    }
}
