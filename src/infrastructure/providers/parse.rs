//! # Fare Parsing
//!
//! Turns a [`RawFare`] into a whole-unit fare.
//!
//! Numbers are taken as-is. Text is scanned for every embedded decimal
//! number and the numbers are averaged, so a range like `"₹245-300"` prices
//! at its midpoint. Text without digits is unusable.

use crate::infrastructure::providers::traits::RawFare;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").ok());

/// Parses `raw` into a fare, or `None` if it holds no usable number.
///
/// # Examples
///
/// ```
/// use fare_compare::infrastructure::providers::parse::parse_fare;
/// use fare_compare::infrastructure::providers::traits::RawFare;
///
/// assert_eq!(parse_fare(&RawFare::Number(244.6)), Some(245));
/// assert_eq!(parse_fare(&RawFare::Text("₹10-12".into())), Some(11));
/// assert_eq!(parse_fare(&RawFare::Text("N/A".into())), None);
/// ```
#[must_use]
pub fn parse_fare(raw: &RawFare) -> Option<u64> {
    match raw {
        RawFare::Number(n) => to_fare(*n),
        RawFare::Text(text) => average_of_numbers(text).and_then(to_fare),
        RawFare::Missing => None,
    }
}

/// Averages every decimal number embedded in `text`.
#[must_use]
pub fn average_of_numbers(text: &str) -> Option<f64> {
    let pattern = NUMBER.as_ref()?;
    let numbers: Vec<f64> = pattern
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if numbers.is_empty() {
        return None;
    }
    Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

fn to_fare(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}
