//! Shape validation for untyped changeset input.
//!
//! The typed API cannot express malformed stores, so these checks only run
//! when data arrives as a [`serde_json::Value`] (configuration loaded from
//! JSON, or the `*_value` setters on [`crate::Changeset`]). Every validator
//! takes a `subject` used to prefix the error message, e.g. `originals` or
//! `errors.email[0]`.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{AllFieldErrors, FieldError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{subject} can't be null")]
    Null { subject: String },
    #[error("{subject} must be an object")]
    NotObject { subject: String },
    #[error("{subject} can't be an array")]
    Array { subject: String },
    #[error("{subject} must be an array")]
    NotArray { subject: String },
    #[error("{subject} must have a message property")]
    MissingMessage { subject: String },
    #[error("{subject} message must be a string")]
    MessageNotString { subject: String },
    #[error("{subject} must be a string or null")]
    NotStringOrNull { subject: String },
    #[error("{subject} must be one of: {allowed}")]
    UnknownListenerKind { subject: String, allowed: String },
}

impl ValidationError {
    /// The value description this error was raised for.
    pub fn subject(&self) -> &str {
        match self {
            ValidationError::Null { subject }
            | ValidationError::NotObject { subject }
            | ValidationError::Array { subject }
            | ValidationError::NotArray { subject }
            | ValidationError::MissingMessage { subject }
            | ValidationError::MessageNotString { subject }
            | ValidationError::NotStringOrNull { subject }
            | ValidationError::UnknownListenerKind { subject, .. } => subject,
        }
    }
}

/// Validate that a value is a key-value mapping.
///
/// `None` stands for an absent (undefined) value.
///
/// # Errors
///
/// - `null` → "can't be null"
/// - arrays → "can't be an array"
/// - absent values, strings, numbers and booleans → "must be an object"
///
/// # Example
///
/// ```
/// use changeset::validate::validate_object;
/// use serde_json::json;
///
/// assert!(validate_object("originals", Some(&json!({"a": 1}))).is_ok());
/// let err = validate_object("originals", Some(&json!([]))).unwrap_err();
/// assert_eq!(err.to_string(), "originals can't be an array");
/// ```
pub fn validate_object<'a>(
    subject: &str,
    value: Option<&'a Value>,
) -> Result<&'a Map<String, Value>, ValidationError> {
    let subject = subject.to_string();
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) => Err(ValidationError::Null { subject }),
        Some(Value::Array(_)) => Err(ValidationError::Array { subject }),
        Some(_) | None => Err(ValidationError::NotObject { subject }),
    }
}

/// Validate a single field error object.
///
/// Checks run in order: object shape, not an array, `message` present,
/// `message` a string or null. Attributes other than `message` are not
/// inspected.
pub fn validate_field_error(subject: &str, value: &Value) -> Result<FieldError, ValidationError> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Err(ValidationError::Array {
                subject: subject.to_string(),
            })
        }
        _ => {
            return Err(ValidationError::NotObject {
                subject: subject.to_string(),
            })
        }
    };
    match obj.get("message") {
        None => Err(ValidationError::MissingMessage {
            subject: subject.to_string(),
        }),
        Some(Value::Null) | Some(Value::String(_)) => Ok(FieldError::from_object(obj)),
        Some(_) => Err(ValidationError::MessageNotString {
            subject: subject.to_string(),
        }),
    }
}

/// Validate a list of field errors. Element subjects are `subject[index]`.
pub fn validate_error_list(subject: &str, value: &Value) -> Result<Vec<FieldError>, ValidationError> {
    let items = value.as_array().ok_or_else(|| ValidationError::NotArray {
        subject: subject.to_string(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_field_error(&format!("{subject}[{i}]"), item))
        .collect()
}

/// Validate a mapping of field name to error list.
///
/// Null entries are accepted and mean "no errors recorded" for that field.
/// Entry subjects are `subject.field`.
pub fn validate_all_errors(subject: &str, value: Option<&Value>) -> Result<AllFieldErrors, ValidationError> {
    let map = validate_object(subject, value)?;
    let mut out = AllFieldErrors::with_capacity(map.len());
    for (field, entry) in map {
        let list = match entry {
            Value::Null => None,
            other => Some(validate_error_list(&format!("{subject}.{field}"), other)?),
        };
        out.insert(field.clone(), list);
    }
    Ok(out)
}

/// Validate a top-level error message: a string or null.
pub fn validate_error_message(subject: &str, value: &Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ValidationError::NotStringOrNull {
            subject: subject.to_string(),
        }),
    }
}
