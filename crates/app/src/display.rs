//! Text formatting shared by the screens.

use bharatbit_core::PricePoint;
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

fn lakh() -> Decimal {
    Decimal::from(100_000)
}

/// INR price with lakh abbreviation above one lakh, `---` when unknown.
pub fn format_inr(value: Decimal) -> String {
    if value.is_zero() {
        return "---".to_string();
    }
    if value.is_sign_negative() {
        return format!("-{}", format_inr(-value));
    }
    if value >= lakh() {
        return format!("₹{:.2}L", round2(value / lakh()));
    }
    format!("₹{}", group_indian(round2(value).normalize()))
}

pub fn format_usd(value: Decimal) -> String {
    if value.is_zero() {
        return "---".to_string();
    }
    format!("${}", round2(value).normalize())
}

/// Signed 24h change, e.g. `+1.25%`.
pub fn format_change(change: Decimal) -> String {
    let rounded = round2(change);
    if rounded.is_zero() {
        "0.00%".to_string()
    } else if rounded.is_sign_positive() {
        format!("+{rounded:.2}%")
    } else {
        format!("{rounded:.2}%")
    }
}

/// Crypto quantity with six decimals.
pub fn format_quantity(value: Decimal) -> String {
    format!("{:.6}", value.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero))
}

/// Rupee amount with two decimals and Indian digit grouping.
pub fn format_rupees(value: Decimal) -> String {
    let rounded = round2(value);
    let text = format!("{rounded:.2}");
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let (sign, int) = match int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int),
    };
    format!("{sign}₹{}.{frac}", group_digits(int))
}

pub fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One-line sparkline of a price series.
pub fn sparkline(points: &[PricePoint]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let (Some(min), Some(max)) = (
        points.iter().map(|p| p.price).min(),
        points.iter().map(|p| p.price).max(),
    ) else {
        return String::new();
    };
    let span = max - min;
    points
        .iter()
        .map(|p| {
            if span.is_zero() {
                return BARS[3];
            }
            let scaled = (p.price - min) / span * Decimal::from(7);
            let idx = scaled.round().to_usize().unwrap_or(0);
            BARS[idx.min(7)]
        })
        .collect()
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_indian(value: Decimal) -> String {
    let text = value.to_string();
    match text.split_once('.') {
        Some((int, frac)) => format!("{}.{frac}", group_digits(int)),
        None => group_digits(&text),
    }
}

/// 12345678 -> 1,23,45,678
fn group_digits(int: &str) -> String {
    if let Some(digits) = int.strip_prefix('-') {
        return format!("-{}", group_digits(digits));
    }
    if int.len() <= 3 {
        return int.to_string();
    }
    let (head, tail) = int.split_at(int.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Decimal::ZERO), "---");
        assert_eq!(format_inr(dec!(89.5)), "₹89.5");
        assert_eq!(format_inr(dec!(12345.678)), "₹12,345.68");
        assert_eq!(format_inr(dec!(5634000)), "₹56.34L");
        assert_eq!(format_inr(dec!(100000)), "₹1.00L");
        assert_eq!(format_inr(dec!(-12345)), "-₹12,345");
        assert_eq!(format_inr(dec!(-250000)), "-₹2.50L");
    }

    #[test]
    fn test_group_digits_keeps_sign_outside() {
        assert_eq!(group_digits("-12345"), "-12,345");
        assert_eq!(group_digits("-123"), "-123");
        assert_eq!(group_indian(dec!(-1234567.5)), "-12,34,567.5");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(dec!(1.254)), "+1.25%");
        assert_eq!(format_change(dec!(-0.5)), "-0.50%");
        assert_eq!(format_change(dec!(0.001)), "0.00%");
    }

    #[test]
    fn test_format_rupees_grouping() {
        assert_eq!(format_rupees(dec!(8950)), "₹8,950.00");
        assert_eq!(format_rupees(dec!(12345678.9)), "₹1,23,45,678.90");
        assert_eq!(format_rupees(dec!(-1500)), "-₹1,500.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec!(1.5)), "1.500000");
    }

    #[test]
    fn test_sparkline() {
        let point = |price| PricePoint {
            timestamp: 0,
            price,
            date: None,
            time: None,
        };
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[point(dec!(1)), point(dec!(8))]), "▁█");
        assert_eq!(sparkline(&[point(dec!(5)), point(dec!(5))]), "▄▄");
    }
}
