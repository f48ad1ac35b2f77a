//! Field-level validation and coercion of an extracted JSON object.
//!
//! Coercion is lenient where the intent is unambiguous (`"50"` for a score,
//! `"True"` for a boolean, `"Plastic"` for a category) and strict on the final
//! shape: unknown categories, non-numeric or out-of-range scores and a missing
//! `recyclable` flag are rejected.

use serde_json::{Map, Value};

use crate::protocols::classification::{ClassificationResult, Quantity, WasteType, MAX_SCORE};

/// Keys the model may use for the reward score, in priority order.
pub const SCORE_KEYS: [&str; 2] = ["kwetche", "score"];

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate an extracted object and build the classification record.
pub fn validate(object: &Map<String, Value>) -> Result<ClassificationResult, FieldError> {
    Ok(ClassificationResult {
        recyclable: coerce_recyclable(object.get("recyclable"))?,
        waste_type: coerce_label(object.get("type"), "type", WasteType::from_label, || {
            expected_labels(WasteType::ALL.iter().map(WasteType::as_str))
        })?,
        explanation: coerce_explanation(object.get("explanation"))?,
        quantity: coerce_label(object.get("quantity"), "quantity", Quantity::from_label, || {
            expected_labels(Quantity::ALL.iter().map(Quantity::as_str))
        })?,
        score: coerce_score(object)?,
    })
}

fn coerce_recyclable(value: Option<&Value>) -> Result<bool, FieldError> {
    match value {
        None => Err(FieldError::new("recyclable", "missing required field")),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" => Ok(false),
            _ => Err(FieldError::new(
                "recyclable",
                format!("expected a boolean, got string '{}'", s),
            )),
        },
        Some(other) => Err(FieldError::new(
            "recyclable",
            format!("expected a boolean, got {}", other),
        )),
    }
}

fn coerce_explanation(value: Option<&Value>) -> Result<String, FieldError> {
    match value {
        None => Err(FieldError::new("explanation", "missing required field")),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(FieldError::new(
            "explanation",
            format!("expected a string, got {}", other),
        )),
    }
}

/// Labels that models use to mean "no value".
fn is_empty_label(label: &str) -> bool {
    matches!(
        label.trim().to_ascii_lowercase().as_str(),
        "" | "none" | "null" | "n/a"
    )
}

fn expected_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

fn coerce_label<T>(
    value: Option<&Value>,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
    expected: impl FnOnce() -> String,
) -> Result<Option<T>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if is_empty_label(s) => Ok(None),
        Some(Value::String(s)) => parse(s).map(Some).ok_or_else(|| {
            FieldError::new(
                field,
                format!("'{}' is not one of: {}", s.trim(), expected()),
            )
        }),
        Some(other) => Err(FieldError::new(
            field,
            format!("expected a string or null, got {}", other),
        )),
    }
}

fn coerce_score(object: &Map<String, Value>) -> Result<Option<u8>, FieldError> {
    // A null under the preferred key falls through to the alias.
    let Some((field, value)) = SCORE_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .filter(|value| !value.is_null())
            .map(|value| (*key, value))
    }) else {
        return Ok(None);
    };

    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).unwrap_or(i64::MAX)
            } else {
                integral_float(n.as_f64(), field, &n.to_string())?
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => i,
                Err(_) => integral_float(trimmed.parse::<f64>().ok(), field, s)?,
            }
        }
        other => {
            return Err(FieldError::new(
                field,
                format!("expected an integer, got {}", other),
            ))
        }
    };

    if !(0..=i64::from(MAX_SCORE)).contains(&number) {
        return Err(FieldError::new(
            field,
            format!("{} is outside the range 0..={}", number, MAX_SCORE),
        ));
    }
    Ok(Some(number as u8))
}

/// Accept floats like `50.0`; reject anything with a fractional part.
fn integral_float(value: Option<f64>, field: &'static str, shown: &str) -> Result<i64, FieldError> {
    match value {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => Ok(f as i64),
        Some(_) => Err(FieldError::new(
            field,
            format!("'{}' is not an integer", shown),
        )),
        None => Err(FieldError::new(
            field,
            format!("'{}' is not numeric", shown),
        )),
    }
}
