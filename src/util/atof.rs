//! String to number conversion
//!
//! Parses the `StringNumericLiteral` grammar: optional surrounding
//! whitespace, then an empty string, a signed decimal literal, a signed
//! `Infinity`, or an unsigned hexadecimal integer. Anything else is `NaN`.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::unicode::trim_whitespace;

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)$")
        .expect("decimal literal pattern is valid")
});

static HEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+$").expect("hex literal pattern is valid"));

/// `ToNumber` applied to a string
pub fn string_to_number(units: &[u16]) -> f64 {
    let trimmed = trim_whitespace(units);
    if trimmed.is_empty() {
        return 0.0;
    }
    // The grammar is pure ASCII once whitespace is gone
    if trimmed.iter().any(|&u| u > 0x7F) {
        return f64::NAN;
    }
    let text: String = trimmed.iter().map(|&u| u as u8 as char).collect();

    if HEX_LITERAL.is_match(&text) {
        return text[2..]
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
    }
    if !DECIMAL_LITERAL.is_match(&text) {
        return f64::NAN;
    }
    if text.ends_with("Infinity") {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}
