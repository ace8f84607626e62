//! Amount normalization for rupee-formatted invoice totals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Code points of '0' in the decimal digit blocks accepted besides ASCII.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0A66, // Gurmukhi
    0x0AE6, // Gujarati
    0x0B66, // Oriya
    0x0BE6, // Tamil
    0x0C66, // Telugu
    0x0CE6, // Kannada
    0x0D66, // Malayalam
    0x0DE6, // Sinhala Lith
    0x0E50, // Thai
    0x0ED0, // Lao
    0x1040, // Myanmar
    0x17E0, // Khmer
    0xFF10, // Fullwidth
];

/// ASCII form of a decimal digit from any accepted script.
fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    let code = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .and_then(|&zero| char::from_digit(code - zero, 10))
}

/// Normalize a currency string (e.g. "₹1,29,900.00") into a number.
///
/// Everything except decimal digits and '.' is dropped; digits of Indian
/// and other scripts count as their ASCII value. Returns `None` when no
/// digit is left or the residue is not a single decimal number.
pub fn normalize_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter_map(|c| if c == '.' { Some(c) } else { ascii_digit(c) })
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if cleaned.matches('.').count() > 1 {
        return None;
    }

    // ".5" and "5." are valid totals
    let normalized = match (cleaned.starts_with('.'), cleaned.ends_with('.')) {
        (true, _) => format!("0{}", cleaned),
        (false, true) => cleaned[..cleaned.len() - 1].to_string(),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount with Indian digit grouping (1,23,45,678.90).
pub fn format_inr(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s, "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let len = chars.len();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining >= 3 && (remaining == 3 || (remaining - 3) % 2 == 0) {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("₹50,000.00"), Some(dec("50000")));
        assert_eq!(normalize_amount("  INR 1,299.00 "), Some(dec("1299")));
        assert_eq!(normalize_amount("₹1,29,900.00"), Some(dec("129900")));
        assert_eq!(normalize_amount("999"), Some(dec("999")));
        assert_eq!(normalize_amount("₹ 2,500.50/-"), Some(dec("2500.5")));
    }

    #[test]
    fn test_normalize_amount_native_digits() {
        assert_eq!(normalize_amount("₹१,२००"), Some(dec("1200")));
        assert_eq!(normalize_amount("৫০০.৫০"), Some(dec("500.50")));
        assert_eq!(normalize_amount("１２３"), Some(dec("123")));
        // Non-decimal numerals are noise
        assert_eq!(normalize_amount("½"), None);
    }

    #[test]
    fn test_normalize_amount_without_digits() {
        assert_eq!(normalize_amount("₹"), None);
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("Rupees Only"), None);
        assert_eq!(normalize_amount("."), None);
    }

    #[test]
    fn test_normalize_amount_malformed() {
        assert_eq!(normalize_amount("1.2.3"), None);
        // Two dots survive the filter here: "Rs." plus the decimal point
        assert_eq!(normalize_amount("Rs.12.50"), None);
    }

    #[test]
    fn test_normalize_amount_bare_decimal_point() {
        assert_eq!(normalize_amount(".5"), Some(dec("0.5")));
        assert_eq!(normalize_amount("5."), Some(dec("5")));
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(dec("12345678.9")), "1,23,45,678.90");
        assert_eq!(format_inr(dec("129900")), "1,29,900.00");
        assert_eq!(format_inr(dec("1299")), "1,299.00");
        assert_eq!(format_inr(dec("999.5")), "999.50");
        assert_eq!(format_inr(dec("-1500")), "-1,500.00");
    }
}
