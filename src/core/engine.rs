use crate::core::accumulator::accumulate;
use crate::core::registry::RateRegistry;
use crate::core::surcharge::apply_surcharge;
use crate::core::validator::validate;
use crate::domain::model::{BillResult, ConsumptionInput, CustomerClass};
use crate::domain::ports::ScheduleProvider;
use crate::utils::error::ValidationError;
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

/// Days between computing a bill and its due date.
pub const DUE_IN_DAYS: i64 = 15;

/// Stateless billing pipeline over a set of rate schedules.
pub struct BillingEngine<P: ScheduleProvider> {
    schedules: P,
}

impl<P: ScheduleProvider> BillingEngine<P> {
    pub fn new(schedules: P) -> Self {
        Self { schedules }
    }

    pub fn schedules(&self) -> &P {
        &self.schedules
    }

    pub fn compute_bill(
        &self,
        raw: impl Into<ConsumptionInput>,
        customer_class: CustomerClass,
    ) -> Result<BillResult, ValidationError> {
        self.compute_bill_at(raw, customer_class, Utc::now())
    }

    /// Same as [`compute_bill`](Self::compute_bill) with an explicit clock.
    pub fn compute_bill_at(
        &self,
        raw: impl Into<ConsumptionInput>,
        customer_class: CustomerClass,
        now: DateTime<Utc>,
    ) -> Result<BillResult, ValidationError> {
        let raw = raw.into();
        let consumption = validate(&raw).inspect_err(|e| {
            tracing::debug!(input = %raw, kind = ?e.kind, "Consumption rejected");
        })?;

        let schedule = self.schedules.schedule(customer_class);
        let accumulation = accumulate(consumption, schedule);
        let surcharge = apply_surcharge(accumulation.subtotal, schedule);

        // Reported totals are built from the rounded line items so that
        // total_due always equals the sum of what the customer sees.
        let subtotal: Decimal = accumulation.line_items.iter().map(|i| i.amount).sum();
        let total_due = subtotal + surcharge.line_item.amount;

        let mut line_items = accumulation.line_items;
        let surcharge_amount = surcharge.line_item.amount;
        line_items.push(surcharge.line_item);

        let due_date = (now + TimeDelta::days(DUE_IN_DAYS)).date_naive();

        tracing::debug!(
            customer_class = %customer_class,
            consumption = %consumption,
            total_due = %total_due,
            "Bill computed"
        );

        Ok(BillResult::new(
            consumption,
            customer_class,
            line_items,
            accumulation.tier_charges,
            subtotal,
            surcharge_amount,
            total_due,
            now,
            due_date,
        ))
    }
}

impl BillingEngine<&'static RateRegistry> {
    pub fn builtin() -> Self {
        Self::new(RateRegistry::builtin())
    }
}

/// Computes a bill against the built-in schedules.
pub fn compute_bill(
    raw: impl Into<ConsumptionInput>,
    customer_class: CustomerClass,
) -> Result<BillResult, ValidationError> {
    BillingEngine::builtin().compute_bill(raw, customer_class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ValidationErrorKind;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_residential_first_bracket() {
        let bill = BillingEngine::builtin()
            .compute_bill_at(5, CustomerClass::Residential, fixed_now())
            .unwrap();
        assert_eq!(bill.total_due(), dec!(315.00));
        assert_eq!(bill.subtotal(), dec!(300.00));
        assert_eq!(bill.surcharge(), dec!(15.00));
        assert_eq!(bill.line_items().len(), 3);
        assert_eq!(bill.line_items()[2].label, "Environmental Fee");
    }

    #[test]
    fn test_due_date_is_fifteen_days_out() {
        let bill = BillingEngine::builtin()
            .compute_bill_at("25", CustomerClass::Residential, fixed_now())
            .unwrap();
        assert_eq!(bill.computed_at(), fixed_now());
        assert_eq!(
            bill.due_date(),
            chrono::NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
        );
    }

    #[test]
    fn test_schedules_exposes_the_provider() {
        let mut residential = RateRegistry::builtin()
            .get_schedule(CustomerClass::Residential)
            .clone();
        residential.surcharge_rate = dec!(0.10);
        let commercial = RateRegistry::builtin()
            .get_schedule(CustomerClass::Commercial)
            .clone();
        let registry = RateRegistry::from_schedules(vec![residential, commercial]).unwrap();

        let engine = BillingEngine::new(&registry);
        assert!(std::ptr::eq(*engine.schedules(), &registry));
        assert_eq!(
            engine
                .schedules()
                .get_schedule(CustomerClass::Residential)
                .surcharge_rate,
            dec!(0.10)
        );
    }

    #[test]
    fn test_reading_below_resolution_pays_minimum_charge() {
        let bill = compute_bill("1e-40", CustomerClass::Residential).unwrap();
        assert_eq!(bill.total_due(), dec!(315.00));
        assert!(compute_bill("-1e-40", CustomerClass::Residential).is_err());
    }

    #[test]
    fn test_validation_error_short_circuits() {
        let err = compute_bill("-3", CustomerClass::Residential).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NonPositive);

        let err = compute_bill(1500, CustomerClass::Commercial).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn test_total_matches_line_items_with_fractional_consumption() {
        let bill = compute_bill("10.333", CustomerClass::Residential).unwrap();
        let sum: Decimal = bill.line_items().iter().map(|i| i.amount).sum();
        assert_eq!(bill.total_due(), sum);
        assert_eq!(bill.total_due(), dec!(322.86));
    }
}
