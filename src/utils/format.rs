use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const CURRENCY_SYMBOL: &str = "₱";

/// Rounds half away from zero and pins the scale to two places.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `₱1,234.56`
pub fn format_peso(value: Decimal) -> String {
    let rounded = round_money(value);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, cents)
}

/// `0.05` -> `5%`
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

/// Drops trailing zeros so `10.50` reads as `10.5`.
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(7.4925)).to_string(), "7.49");
        assert_eq!(round_money(dec!(0.125)).to_string(), "0.13");
        assert_eq!(round_money(dec!(315)).to_string(), "315.00");
    }

    #[test]
    fn test_format_peso() {
        assert_eq!(format_peso(dec!(0)), "₱0.00");
        assert_eq!(format_peso(dec!(180)), "₱180.00");
        assert_eq!(format_peso(dec!(2184)), "₱2,184.00");
        assert_eq!(format_peso(dec!(1234567.891)), "₱1,234,567.89");
        assert_eq!(format_peso(dec!(-45.5)), "-₱45.50");
    }

    #[test]
    fn test_format_percent_and_quantity() {
        assert_eq!(format_percent(dec!(0.05)), "5%");
        assert_eq!(format_percent(dec!(0.125)), "12.5%");
        assert_eq!(format_quantity(dec!(10.50)), "10.5");
        assert_eq!(format_quantity(dec!(20)), "20");
    }
}
