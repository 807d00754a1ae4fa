//! Numeric normalization for template fields
//!
//! Stored templates may carry their measurements either as numbers or as
//! locale-formatted strings (`"63,5"`). Everything is converted to `f32` once,
//! at the boundary, through [`to_number`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric field as it arrives from a store or request body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum NumericValue {
    Number(f64),
    Text(String),
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Number(value)
    }
}

impl From<&str> for NumericValue {
    fn from(value: &str) -> Self {
        NumericValue::Text(value.to_string())
    }
}

/// Normalize an optional numeric field.
///
/// Numbers pass through unchanged, the first comma of a string is read as the
/// decimal separator, and an absent or blank value becomes `0`. Returns `None`
/// only for text that is not a number at all.
pub fn to_number(value: Option<&NumericValue>) -> Option<f32> {
    match value {
        None => Some(0.0),
        Some(NumericValue::Number(n)) => Some(*n as f32),
        Some(NumericValue::Text(s)) => parse_decimal(s),
    }
}

/// Parse a decimal string that may use a comma as separator
pub fn parse_decimal(text: &str) -> Option<f32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let normalized = trimmed.replacen(',', ".", 1);
    normalized.parse::<f32>().ok().filter(|v| v.is_finite())
}
