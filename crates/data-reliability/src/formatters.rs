/// Sentinel rendered for any value that is missing or not a usable number.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default number of decimals for percents and ratios.
pub const DEFAULT_DECIMALS: usize = 2;

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Format a percentage with two decimals, scaling fractions by 100.
pub fn format_percent(value: Option<f64>) -> String {
    format_percent_with(value, DEFAULT_DECIMALS, false)
}

/// Format a percentage.
///
/// Values with `|value| <= 1` are taken to be fractions and multiplied by
/// 100; larger magnitudes are assumed to already be percents. This makes a
/// genuine 1% input render as `"100.00%"`. Pass `assume_fractional` when the
/// caller knows the value is a fraction regardless of magnitude.
pub fn format_percent_with(value: Option<f64>, decimals: usize, assume_fractional: bool) -> String {
    let Some(mut value) = usable(value) else {
        return NOT_AVAILABLE.to_string();
    };
    if assume_fractional || value.abs() <= 1.0 {
        value *= 100.0;
    }
    format!("{:.*}%", decimals, value)
}

/// Format a plain ratio with two decimals.
pub fn format_ratio(value: Option<f64>) -> String {
    format_ratio_with(value, DEFAULT_DECIMALS)
}

/// Plain number at `decimals` places, or `"N/A"` when missing or non-finite.
pub fn format_ratio_with(value: Option<f64>, decimals: usize) -> String {
    match usable(value) {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a dollar amount: `$1,234.50`. Negative amounts render as `$-12.00`.
pub fn format_currency(value: Option<f64>) -> String {
    match usable(value) {
        Some(v) => format!("${}", group_thousands(&format!("{:.2}", v))),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a count rounded to the nearest integer (half away from zero) with
/// thousands separators.
pub fn format_integer(value: Option<f64>) -> String {
    let Some(v) = usable(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let rounded = v.round();
    // -0.4 rounds to -0.0, which would print as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    group_thousands(&format!("{:.0}", rounded))
}

/// Insert `,` separators into the integer part of a plain decimal string
/// such as `-1234567.89`.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_render_sentinel() {
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_ratio(None), "N/A");
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_integer(None), "N/A");
    }

    #[test]
    fn test_non_finite_values_render_sentinel() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(format_percent(Some(v)), "N/A");
            assert_eq!(format_ratio(Some(v)), "N/A");
            assert_eq!(format_currency(Some(v)), "N/A");
            assert_eq!(format_integer(Some(v)), "N/A");
        }
    }

    #[test]
    fn test_percent_fraction_heuristic() {
        assert_eq!(format_percent(Some(0.5)), "50.00%");
        assert_eq!(format_percent(Some(50.0)), "50.00%");
        assert_eq!(format_percent(Some(-0.25)), "-25.00%");
        assert_eq!(format_percent(Some(-12.5)), "-12.50%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
    }

    #[test]
    fn test_percent_threshold_at_one() {
        // 1.0 is indistinguishable from 100% and is scaled
        assert_eq!(format_percent(Some(1.0)), "100.00%");
        assert_eq!(format_percent(Some(-1.0)), "-100.00%");
        assert_eq!(format_percent(Some(1.5)), "1.50%");
    }

    #[test]
    fn test_percent_assume_fractional_and_decimals() {
        assert_eq!(format_percent_with(Some(0.045), 2, true), "4.50%");
        assert_eq!(format_percent_with(Some(2.0), 1, true), "200.0%");
        assert_eq!(format_percent_with(Some(12.345), 0, false), "12%");
        assert_eq!(format_percent_with(Some(0.123456), 3, false), "12.346%");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(format_ratio(Some(23.456)), "23.46");
        assert_eq!(format_ratio(Some(-1.0)), "-1.00");
        assert_eq!(format_ratio_with(Some(0.87654), 4), "0.8765");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Some(1234.5)), "$1,234.50");
        assert_eq!(format_currency(Some(0.0)), "$0.00");
        assert_eq!(format_currency(Some(999.999)), "$1,000.00");
        assert_eq!(format_currency(Some(1_234_567.891)), "$1,234,567.89");
        assert_eq!(format_currency(Some(-2500.0)), "$-2,500.00");
    }

    #[test]
    fn test_integer_rounding() {
        assert_eq!(format_integer(Some(1234.5)), "1,235");
        assert_eq!(format_integer(Some(1234.4)), "1,234");
        assert_eq!(format_integer(Some(-1234.5)), "-1,235");
        assert_eq!(format_integer(Some(-0.4)), "0");
        assert_eq!(format_integer(Some(12_000_000.0)), "12,000,000");
        assert_eq!(format_integer(Some(999.0)), "999");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("-1234567.89"), "-1,234,567.89");
    }
}
