//! Display formatting: US dollars and short US dates.

use chrono::NaiveDate;

/// `1234.5` -> `$1,234.50`, `-5.0` -> `-$5.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = to_cents(amount.abs());
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// Rounds half up on the shortest decimal form, so `1.005` gives 101 cents.
fn to_cents(amount: f64) -> u64 {
    let repr = amount.to_string();
    let (whole, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut digits = frac.bytes().map(|b| u64::from(b.wrapping_sub(b'0')));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);
    whole.parse::<u64>().unwrap_or(0) * 100 + tenths * 10 + hundredths + u64::from(round_up)
}

/// `2025-01-05` -> `Jan 5, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(210.0), "$210.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(0.125), "$0.13");
    }

    #[test]
    fn currency_rounds_decimal_half_cents_up() {
        assert_eq!(format_currency(1.005), "$1.01");
        assert_eq!(format_currency(2.675), "$2.68");
        assert_eq!(format_currency(1.004), "$1.00");
        assert_eq!(format_currency(-1.005), "-$1.01");
        assert_eq!(format_currency(0.999), "$1.00");
        assert_eq!(format_currency(1e-7), "$0.00");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "Jan 5, 2025");
        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_date(d), "Dec 31, 2024");
    }
}
