//! Payload validation
//!
//! Turns a loosely typed JSON object into a normalized record for one
//! [`TypeSchema`](super::TypeSchema): every declared field is checked
//! against its descriptor and the result carries every declared field,
//! with defaults filled in for omitted optionals. Violations are collected
//! across the whole payload so a caller sees all problems at once.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{FieldKind, FieldSpec, TypeSchema};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validation failure carrying every violation found in the payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for {}: {}", .type_name, .violations.join("; "))]
pub struct ValidationError {
    pub type_name: String,
    pub violations: Vec<String>,
}

impl TypeSchema {
    /// Validate a payload against this type and normalize it.
    ///
    /// Checks run in declaration order; unknown payload fields are rejected.
    /// On success the returned map holds every declared field: present values
    /// pass through, omitted optionals take their default (or null), and an
    /// explicit null is kept only on nullable fields (optional, no declared
    /// default); anywhere else null fails the field's kind check.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
        let mut violations = Vec::new();
        let mut record = Map::new();

        for field in self.fields {
            match payload.get(field.name) {
                None => {
                    if field.required {
                        violations.push(format!("missing required field '{}'", field.name));
                    } else {
                        record.insert(field.name.to_string(), field.default_value());
                    }
                }
                Some(Value::Null) if field.nullable() => {
                    record.insert(field.name.to_string(), Value::Null);
                }
                Some(value) => match check_kind(field, value) {
                    Ok(()) => {
                        record.insert(field.name.to_string(), value.clone());
                    }
                    Err(violation) => violations.push(violation),
                },
            }
        }

        for key in payload.keys() {
            if self.field(key).is_none() {
                violations.push(format!("unknown field '{}'", key));
            }
        }

        if violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError { type_name: self.name.to_string(), violations })
        }
    }
}

fn check_kind(field: &FieldSpec, value: &Value) -> Result<(), String> {
    match field.kind {
        FieldKind::Text => {
            if value.is_string() {
                Ok(())
            } else {
                Err(format!("field '{}' must be a string", field.name))
            }
        }
        FieldKind::Email => match value.as_str() {
            Some(text) if EMAIL_PATTERN.is_match(text) => Ok(()),
            Some(_) => Err(format!("field '{}' must be a valid email address", field.name)),
            None => Err(format!("field '{}' must be a string", field.name)),
        },
        FieldKind::Flag => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(format!("field '{}' must be a boolean", field.name))
            }
        }
        // as_u64 covers the whole check: negatives and floats have no u64 form
        FieldKind::Count => {
            if value.as_u64().is_some() {
                Ok(())
            } else {
                Err(format!("field '{}' must be a non-negative integer", field.name))
            }
        }
        FieldKind::Choice(allowed) => match value.as_str() {
            Some(text) if allowed.contains(&text) => Ok(()),
            _ => Err(format!("field '{}' must be one of [{}]", field.name, allowed.join(", "))),
        },
        FieldKind::TextList => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => Ok(()),
            _ => Err(format!("field '{}' must be a list of strings", field.name)),
        },
    }
}
