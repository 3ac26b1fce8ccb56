//! Type definitions for changesets.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::validate::{validate_field_error, ValidationError};

/// Baseline field values, keyed by field name.
pub type Originals = Map<String, Value>;

/// Proposed field values, keyed by field name.
pub type Changes = Map<String, Value>;

/// Field errors keyed by field name.
///
/// A `None` entry means "no errors recorded" and is kept distinct from a
/// missing key so that snapshots round-trip.
pub type AllFieldErrors = IndexMap<String, Option<Vec<FieldError>>>;

/// A validation failure attached to a single field.
///
/// `message` is always serialized (as `null` when unset). Any other
/// attributes are carried through in `extra` without inspection; `extra`
/// never holds a `message` key.
///
/// Deserializing runs the same checks as
/// [`validate_field_error`](crate::validate::validate_field_error).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub message: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FieldError {
    /// Create an error with the given message and no extra attributes.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            extra: Map::new(),
        }
    }

    /// Create an error whose message is explicitly null.
    pub fn without_message() -> Self {
        Self {
            message: None,
            extra: Map::new(),
        }
    }

    /// Attach an extra attribute.
    ///
    /// A `message` key sets the message instead: a string becomes the
    /// message and any other value clears it.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key == "message" {
            self.message = match value {
                Value::String(s) => Some(s),
                _ => None,
            };
        } else {
            self.extra.insert(key, value);
        }
        self
    }

    /// Attributes other than `message`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Convert an already-validated JSON object into a field error.
    pub(crate) fn from_object(obj: &Map<String, Value>) -> Self {
        let mut extra = obj.clone();
        let message = match extra.remove("message") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Self { message, extra }
    }
}

impl<'de> Deserialize<'de> for FieldError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validate_field_error("field error", &value).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Kinds of events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    Change,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 1] = [ListenerKind::Change];

    pub fn as_str(self) -> &'static str {
        match self {
            ListenerKind::Change => "change",
        }
    }

    /// Comma-separated list of recognized kinds, as used in error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListenerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownListenerKind {
                subject: format!("listener type {s:?}"),
                allowed: Self::names(),
            })
    }
}
