//! Rupiah-style display helpers: `.` groups thousands, `,` marks decimals.

pub fn format_currency(value: f64) -> String {
    let units = value.abs().round() as i128;
    let grouped = group_thousands(units);
    if value < 0.0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Plain number with up to two decimals, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i128;
    let mut out = group_thousands(cents / 100);
    let frac = cents % 100;
    if frac != 0 {
        if frac % 10 == 0 {
            out.push_str(&format!(",{}", frac / 10));
        } else {
            out.push_str(&format!(",{frac:02}"));
        }
    }
    if value < 0.0 && cents != 0 {
        out.insert(0, '-');
    }
    out
}

/// Parse currency-formatted text: everything except digits and the decimal
/// comma is stripped, the first comma becomes the decimal point, and the
/// leading numeric prefix is parsed. Unparseable text yields 0.
pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    let mut prefix = String::new();
    let mut seen_dot = false;
    for ch in normalized.chars() {
        match ch {
            '0'..='9' => prefix.push(ch),
            '.' if !seen_dot => {
                seen_dot = true;
                prefix.push(ch);
            }
            _ => break,
        }
    }
    prefix.parse().unwrap_or(0.0)
}

fn group_thousands(value: i128) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_and_drops_decimals() {
        assert_eq!(format_currency(16_000_000.0), "Rp 16.000.000");
        assert_eq!(format_currency(22_000.0), "Rp 22.000");
        assert_eq!(format_currency(0.0), "Rp 0");
        assert_eq!(format_currency(999.0), "Rp 999");
        assert_eq!(format_currency(1_500_000.49), "Rp 1.500.000");
    }

    #[test]
    fn negative_currency_keeps_the_sign_outside_the_prefix() {
        assert_eq!(format_currency(-18_000_000.0), "-Rp 18.000.000");
    }

    #[test]
    fn numbers_trim_trailing_zeros() {
        assert_eq!(format_number(727.27), "727,27");
        assert_eq!(format_number(727.0), "727");
        assert_eq!(format_number(1_234.5), "1.234,5");
        assert_eq!(format_number(1_234.56), "1.234,56");
        assert_eq!(format_number(0.05), "0,05");
        assert_eq!(format_number(-3.2), "-3,2");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn parses_grouped_currency_text() {
        assert!((parse_currency("Rp 16.000.000") - 16_000_000.0).abs() < 1e-9);
        assert!((parse_currency("1.234,56") - 1_234.56).abs() < 1e-9);
        assert!((parse_currency("22000") - 22_000.0).abs() < 1e-9);
    }

    #[test]
    fn first_comma_is_the_decimal_point() {
        assert!((parse_currency("12,34,56") - 12.34).abs() < 1e-9);
        assert!((parse_currency("0,5") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unparseable_text_falls_back_to_zero() {
        assert!((parse_currency("") - 0.0).abs() < 1e-9);
        assert!((parse_currency("abc") - 0.0).abs() < 1e-9);
        assert!((parse_currency("Rp ,") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn round_trips_engine_style_amounts() {
        for value in [0.0, 727.27, 22_000.0, 16_000_000.0] {
            let text = format_number(value);
            assert!((parse_currency(&text) - value).abs() < 0.005, "{text}");
        }
    }
}
