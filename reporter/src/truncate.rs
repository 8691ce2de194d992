//! Field length enforcement
//!
//! Every cell written to a report goes through here. A value that cannot be
//! rendered as text becomes an empty cell instead of failing the report.

use crate::error::{ReportError, ReportResult};
use serde_json::{Number, Value};
use tracing::debug;

/// A validated, strictly positive character limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxLength(usize);

impl MaxLength {
    pub const DEFAULT: MaxLength = MaxLength(500);

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn invalid(value: impl ToString) -> ReportError {
    ReportError::MaxLength {
        value: value.to_string(),
    }
}

macro_rules! max_length_from_int {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for MaxLength {
                type Error = ReportError;

                fn try_from(value: $ty) -> ReportResult<Self> {
                    usize::try_from(value)
                        .ok()
                        .filter(|n| *n > 0)
                        .map(MaxLength)
                        .ok_or_else(|| invalid(value))
                }
            }
        )*
    };
}

max_length_from_int!(i32, i64, u32, u64, usize);

impl TryFrom<f64> for MaxLength {
    type Error = ReportError;

    fn try_from(value: f64) -> ReportResult<Self> {
        if value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= usize::MAX as f64 {
            Ok(MaxLength(value as usize))
        } else {
            Err(invalid(value))
        }
    }
}

impl TryFrom<&Value> for MaxLength {
    type Error = ReportError;

    fn try_from(value: &Value) -> ReportResult<Self> {
        match value {
            Value::Number(n) => match (n.as_u64(), n.as_f64()) {
                (Some(u), _) => MaxLength::try_from(u),
                (None, Some(f)) => MaxLength::try_from(f),
                _ => Err(invalid(n)),
            },
            other => Err(invalid(other)),
        }
    }
}

/// Decimal form of a number, whole floats without a fraction (`1200.0` -> `1200`)
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f)
            if n.is_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Outcome of fitting one value into a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Truncation {
    Truncated(String),
    /// The value has no cell representation; written as an empty cell
    Failed,
}

impl Truncation {
    pub fn of(value: &Value, max_length: MaxLength) -> Self {
        match value {
            Value::Null => Truncation::Truncated(String::new()),
            Value::String(s) => Self::of_str(s, max_length),
            Value::Number(n) => Self::of_str(&number_text(n), max_length),
            Value::Bool(b) => Self::of_str(if *b { "true" } else { "false" }, max_length),
            Value::Array(_) | Value::Object(_) => Truncation::Failed,
        }
    }

    pub fn of_str(value: &str, max_length: MaxLength) -> Self {
        Truncation::Truncated(value.chars().take(max_length.get()).collect())
    }

    pub fn into_cell(self) -> String {
        match self {
            Truncation::Truncated(s) => s,
            Truncation::Failed => {
                debug!("Value has no cell representation, writing an empty cell");
                String::new()
            }
        }
    }
}

/// Render `value` as a cell of at most `max_length` characters
///
/// `null` becomes `""`, numbers their decimal form. The limit must be a
/// positive integer; anything else is rejected before the value is looked at.
pub fn enforce_max_length<L>(value: &Value, max_length: L) -> ReportResult<String>
where
    L: TryInto<MaxLength, Error = ReportError>,
{
    let max_length = max_length.try_into()?;
    Ok(Truncation::of(value, max_length).into_cell())
}

pub fn truncate_str(value: &str, max_length: MaxLength) -> String {
    Truncation::of_str(value, max_length).into_cell()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_empty() {
        assert_eq!(enforce_max_length(&Value::Null, 10).unwrap(), "");
        assert_eq!(enforce_max_length(&Value::Null, 1).unwrap(), "");
    }

    #[test]
    fn test_numbers_are_stringified() {
        assert_eq!(enforce_max_length(&json!(12345), 3).unwrap(), "123");
        assert_eq!(enforce_max_length(&json!(1.5), 10).unwrap(), "1.5");
        assert_eq!(enforce_max_length(&json!(-42), 10).unwrap(), "-42");
    }

    #[test]
    fn test_whole_floats_render_like_integers() {
        assert_eq!(enforce_max_length(&json!(3.0), 10).unwrap(), "3");
        let parsed: Value = serde_json::from_str("1200.0").unwrap();
        assert_eq!(enforce_max_length(&parsed, 10).unwrap(), "1200");
        assert_eq!(enforce_max_length(&json!(-7.0), 10).unwrap(), "-7");
        assert_eq!(enforce_max_length(&json!(2.25), 10).unwrap(), "2.25");
    }

    #[test]
    fn test_large_whole_limits_accepted() {
        assert_eq!(enforce_max_length(&json!("abc"), 5e9).unwrap(), "abc");
        assert_eq!(MaxLength::try_from(5e9).unwrap().get(), 5_000_000_000);
        assert_eq!(enforce_max_length(&json!("abc"), &json!(5e9)).unwrap(), "abc");
    }

    #[test]
    fn test_strings_are_truncated() {
        assert_eq!(enforce_max_length(&json!("hello world"), 5).unwrap(), "hello");
        assert_eq!(enforce_max_length(&json!("short"), 500).unwrap(), "short");
        assert_eq!(enforce_max_length(&json!("héllo wörld"), 4).unwrap(), "héll");
    }

    #[test]
    fn test_invalid_max_length_rejected() {
        for value in [json!("x"), json!(12), Value::Null] {
            let err = enforce_max_length(&value, -1).unwrap_err();
            assert!(err.to_string().contains("positive integer"));

            let err = enforce_max_length(&value, 1.5).unwrap_err();
            assert!(err.to_string().contains("positive integer"));

            assert!(enforce_max_length(&value, 0).is_err());
            assert!(enforce_max_length(&value, f64::NAN).is_err());
            assert!(enforce_max_length(&value, &json!("10")).is_err());
        }
    }

    #[test]
    fn test_json_max_length() {
        assert_eq!(enforce_max_length(&json!("abcdef"), &json!(2)).unwrap(), "ab");
        assert_eq!(enforce_max_length(&json!("abcdef"), &json!(3.0)).unwrap(), "abc");
        assert!(enforce_max_length(&json!("abcdef"), &json!(-2)).is_err());
    }

    #[test]
    fn test_unrenderable_values_become_empty() {
        assert_eq!(Truncation::of(&json!({"a": 1}), MaxLength::DEFAULT), Truncation::Failed);
        assert_eq!(enforce_max_length(&json!([1, 2]), 10).unwrap(), "");
        assert_eq!(enforce_max_length(&json!(true), 10).unwrap(), "true");
    }

    #[test]
    fn test_truncate_str() {
        let long = "x".repeat(800);
        assert_eq!(truncate_str(&long, MaxLength::DEFAULT).len(), 500);
        assert_eq!(MaxLength::default().get(), 500);
    }
}
