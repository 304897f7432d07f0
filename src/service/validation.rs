//! Schema-driven validation and sanitization of submission bodies.
//!
//! Two strategies sit behind one entry point, selected once on schema
//! emptiness:
//!
//! - **legacy** (empty schema): passthrough of every key with basic
//!   string sanitization, always valid;
//! - **schema**: the schema acts as an allow-list; declared fields are
//!   checked and sanitized in schema order, undeclared fields are
//!   silently dropped.
//!
//! Sanitization is trim + HTML-escaping of `<` and `>` only. Escaping is
//! deliberately not idempotent for input that already contains entities
//! (`&lt;` stays `&lt;`, but a literal `<` always becomes `&lt;`).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::{FieldSchema, FieldType};

/// `local@domain.tld`, no whitespace. Matches the original gateway's
/// pattern rather than full RFC 5322.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(compile_email_pattern);

#[allow(clippy::unwrap_used)]
fn compile_email_pattern() -> Regex {
    // The pattern is a literal; compilation cannot fail at runtime.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
}

/// Outcome of validating one submission body.
///
/// `sanitized_data` may be partially populated even when `is_valid` is
/// false; callers must only use it when valid.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// `true` when no field produced an error.
    pub is_valid: bool,
    /// Human-readable messages, one per failed field, in schema order.
    pub errors: Vec<String>,
    /// Cleaned output map.
    pub sanitized_data: Map<String, Value>,
}

/// Validates and sanitizes `body` against `schema`.
///
/// An empty schema selects legacy passthrough mode; a non-empty schema
/// validates in schema order. Non-object bodies are treated as empty.
#[must_use]
pub fn validate_and_sanitize(schema: &[FieldSchema], body: &Value) -> ValidationReport {
    static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);
    let data = body.as_object().unwrap_or(&EMPTY);

    if schema.is_empty() {
        sanitize_legacy(data)
    } else {
        validate_schema(schema, data)
    }
}

/// Legacy mode: every key retained, string values trimmed and escaped,
/// never invalid.
fn sanitize_legacy(data: &Map<String, Value>) -> ValidationReport {
    let mut sanitized_data = Map::new();
    for (key, value) in data {
        sanitized_data.insert(key.clone(), sanitize_value(value));
    }
    ValidationReport {
        is_valid: true,
        errors: Vec::new(),
        sanitized_data,
    }
}

/// Schema mode: iterate fields in schema order, accumulating errors
/// rather than short-circuiting. Undeclared input keys never reach the
/// output.
fn validate_schema(schema: &[FieldSchema], data: &Map<String, Value>) -> ValidationReport {
    let mut errors = Vec::new();
    let mut sanitized_data = Map::new();

    for field in schema {
        let value = data.get(&field.id);

        if field.required && is_missing(value) {
            errors.push(format!("{} is required.", field.label));
            continue;
        }

        // Absent-and-optional fields are simply omitted; no null
        // placeholder.
        if is_missing(value) {
            continue;
        }
        let Some(value) = value else {
            continue;
        };

        match field.field_type {
            FieldType::Email => {
                let Some(candidate) = value.as_str() else {
                    errors.push(format!("{} must be a valid email.", field.label));
                    continue;
                };
                if !EMAIL_RE.is_match(candidate) {
                    errors.push(format!("{} must be a valid email.", field.label));
                    continue;
                }
                sanitized_data.insert(field.id.clone(), sanitize_value(value));
            }
            FieldType::Number => {
                let Some(number) = coerce_number(value) else {
                    errors.push(format!("{} must be a number.", field.label));
                    continue;
                };
                sanitized_data.insert(field.id.clone(), Value::Number(number));
            }
            FieldType::Text | FieldType::Textarea | FieldType::Checkbox | FieldType::Select => {
                sanitized_data.insert(field.id.clone(), sanitize_value(value));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        sanitized_data,
    }
}

/// Absent, null, and empty string all count as "missing" for required
/// checks and for omission of optional fields.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Trims and HTML-escapes string values; everything else passes through
/// unchanged.
fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(s)),
        other => other.clone(),
    }
}

fn sanitize_string(raw: &str) -> String {
    raw.trim().replace('<', "&lt;").replace('>', "&gt;")
}

/// Numeric coercion: numbers stay numbers, numeric strings parse
/// (integers preferred over floats), booleans map to 1/0. Arrays,
/// objects and non-numeric strings fail.
fn coerce_number(value: &Value) -> Option<serde_json::Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                Some(serde_json::Number::from(int))
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
            }
        }
        Value::Bool(b) => Some(serde_json::Number::from(i32::from(*b))),
        _ => None,
    }
}
