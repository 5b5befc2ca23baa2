use proptest::prelude::*;
use rust_decimal::Decimal;
use water_bill::{compute_bill, CustomerClass, ValidationErrorKind};

fn customer_class() -> impl Strategy<Value = CustomerClass> {
    prop_oneof![Just(CustomerClass::Residential), Just(CustomerClass::Commercial)]
}

/// Readings in (0, 1000] with up to three decimals.
fn valid_consumption() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

proptest! {
    #[test]
    fn prop_total_equals_sum_of_line_items(consumption in valid_consumption(), class in customer_class()) {
        let bill = compute_bill(consumption, class).unwrap();
        let sum: Decimal = bill.line_items().iter().map(|item| item.amount).sum();
        prop_assert_eq!(sum, bill.total_due());
        prop_assert_eq!(bill.total_due().scale(), 2);
    }

    #[test]
    fn prop_tier_units_cover_consumption_exactly(consumption in valid_consumption(), class in customer_class()) {
        let bill = compute_bill(consumption, class).unwrap();
        prop_assert_eq!(bill.units_billed(), consumption);
        prop_assert_eq!(bill.line_items().len(), bill.tier_charges().len() + 2);
    }

    #[test]
    fn prop_total_is_monotonic(a in valid_consumption(), b in valid_consumption(), class in customer_class()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_bill = compute_bill(low, class).unwrap();
        let high_bill = compute_bill(high, class).unwrap();
        prop_assert!(low_bill.total_due() <= high_bill.total_due());
    }

    #[test]
    fn prop_non_positive_is_rejected(value in -1_000_000i64..=0, class in customer_class()) {
        let err = compute_bill(Decimal::new(value, 2), class).unwrap_err();
        prop_assert_eq!(err.kind, ValidationErrorKind::NonPositive);
    }

    #[test]
    fn prop_above_ceiling_is_rejected(excess in 1i64..=10_000_000, class in customer_class()) {
        let consumption = Decimal::from(1000) + Decimal::new(excess, 3);
        let err = compute_bill(consumption.to_string(), class).unwrap_err();
        prop_assert_eq!(err.kind, ValidationErrorKind::OutOfRange);
    }

    #[test]
    fn prop_non_numeric_text_is_rejected(text in "[a-zA-Z ]{0,12}", class in customer_class()) {
        // "inf"/"nan" spellings included: they parse as floats but are not finite.
        let err = compute_bill(text, class).unwrap_err();
        prop_assert_eq!(err.kind, ValidationErrorKind::NotNumeric);
    }
}
