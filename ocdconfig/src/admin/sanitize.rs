//! Per-kind sanitization of submitted values.
//!
//! Sanitization never rejects a submission: invalid input degrades to `0`,
//! `""` or an empty sequence. `required` is a browser hint only.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::{
    data::field::{FieldKind, FieldSchema, scalar_text},
    html::sanitize_text_field,
};

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?[ \t\n\r\x0B\x0C]*$")
        .unwrap()
});

impl FieldKind {
    /// Coerce a submitted value into what gets stored for this kind.
    pub fn sanitize(self, field: &FieldSchema, raw: &Value) -> Value {
        match self {
            FieldKind::Number => sanitize_number(raw),
            FieldKind::Select => sanitize_select(field, raw),
            FieldKind::Checkboxes => sanitize_checkboxes(field, raw),
            FieldKind::Text | FieldKind::Radio | FieldKind::Color => {
                Value::String(scalar_text(raw).map(|s| sanitize_text_field(&s)).unwrap_or_default())
            }
        }
    }
}

/// Integer when the input has no decimal point, float otherwise, `0` when
/// the input is not numeric.
pub fn sanitize_number(raw: &Value) -> Value {
    match raw {
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => parse_number(s).unwrap_or_else(|| Value::from(0)),
        _ => Value::from(0),
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if !NUMERIC.is_match(s) {
        return None;
    }
    let s = s.trim();
    if s.contains('.') {
        let f: f64 = s.parse().ok()?;
        return Number::from_f64(f).map(Value::Number);
    }
    match s.parse::<i64>() {
        Ok(i) => Some(Value::from(i)),
        Err(_) => {
            // Exponent notation or out of range: truncate the float value.
            let f: f64 = s.parse().ok()?;
            if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                Some(Value::from(f as i64))
            } else {
                Number::from_f64(f).map(Value::Number)
            }
        }
    }
}

/// Keep the submitted value only if it is one of the option keys.
pub fn sanitize_select(field: &FieldSchema, raw: &Value) -> Value {
    match scalar_text(raw) {
        Some(key) if field.options.contains_key(&key) => raw.clone(),
        _ => Value::String(String::new()),
    }
}

/// Keep the submitted entries that are option keys. Always a sequence.
pub fn sanitize_checkboxes(field: &FieldSchema, raw: &Value) -> Value {
    let candidates: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };
    Value::Array(
        candidates
            .into_iter()
            .filter(|v| scalar_text(v).is_some_and(|k| field.options.contains_key(&k)))
            .cloned()
            .collect(),
    )
}
