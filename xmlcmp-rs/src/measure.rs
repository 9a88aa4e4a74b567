//! Text equality measure.
//!
//! Texts are compared after trimming. Two texts that both look like decimal
//! numbers are equal when their values agree within a relative tolerance,
//! so `1.0` matches `1` and `1e3` matches `1000`.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::NUMBER_EPSILON;

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?$").expect("number pattern is valid")
});

/// Parses `text` as a number if it matches the decimal number syntax.
pub fn parse_number(text: &str) -> Option<f64> {
    if !NUMBER_PATTERN.is_match(text) {
        return None;
    }
    text.parse().ok()
}

/// Returns true when `x` and `y` agree within [`NUMBER_EPSILON`].
pub fn numbers_equal(x: f64, y: f64) -> bool {
    (x - y).abs() <= NUMBER_EPSILON * (x.abs() + y.abs() + NUMBER_EPSILON)
}

/// Compares two texts, ignoring surrounding whitespace and tolerating
/// numeric formatting differences.
pub fn texts_equal(text1: &str, text2: &str) -> bool {
    let text1 = text1.trim();
    let text2 = text2.trim();
    if text1 == text2 {
        return true;
    }
    match (parse_number(text1), parse_number(text2)) {
        (Some(x), Some(y)) => numbers_equal(x, y),
        _ => false,
    }
}
