//! Change-tracking record for editing code.
//!
//! A [`Changeset`] holds the *originals* of a record, the proposed *changes*
//! to it, per-field validation errors and an optional record-level error
//! message. Reads through [`Changeset::get_value`] see a change whenever one
//! is recorded for the field, and the original otherwise.
//!
//! # Example
//!
//! ```
//! use changeset::{Changeset, FieldError};
//! use serde_json::json;
//!
//! let mut changeset = Changeset::from_value(json!({
//!     "originals": {"name": "Ada", "email": "ada@example.com"},
//! }))
//! .unwrap();
//!
//! changeset.set_change("name", json!(""));
//! assert_eq!(changeset.get_value("name"), Some(&json!("")));
//! assert_eq!(changeset.get_value("email"), Some(&json!("ada@example.com")));
//!
//! changeset.add_error("name", FieldError::new("can't be blank"));
//! assert!(changeset.has_errors("name"));
//! assert!(changeset.has_any_errors());
//! ```

use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

pub mod error;
pub mod listeners;
pub mod options;
pub mod types;
pub mod validate;

pub use error::{ChangesetError, ListenerError};
pub use listeners::ChangeListener;
pub use options::ChangesetOptions;
pub use types::{AllFieldErrors, Changes, FieldError, ListenerKind, Originals};
pub use validate::ValidationError;

use listeners::Listeners;
use validate::{validate_all_errors, validate_error_list, validate_error_message, validate_field_error, validate_object};

/// Originals, proposed changes and validation errors for one record.
///
/// Serializes as `{"originals", "changes", "errors", "errorMessage"}`;
/// listeners are not part of the snapshot.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    originals: Originals,
    changes: Changes,
    errors: AllFieldErrors,
    error_message: Option<String>,
    #[serde(skip)]
    listeners: Listeners,
}

impl Changeset {
    pub fn new(options: ChangesetOptions) -> Self {
        let ChangesetOptions {
            originals,
            changes,
            errors,
            error_message,
            on_change,
        } = options;
        let mut listeners = Listeners::default();
        if let Some(listener) = on_change {
            listeners.add(ListenerKind::Change, listener);
        }
        Self {
            originals,
            changes,
            errors,
            error_message,
            listeners,
        }
    }

    /// Build a changeset from untyped JSON configuration.
    ///
    /// See [`ChangesetOptions::from_value`] for the accepted shape.
    pub fn from_value(config: Value) -> Result<Self, ChangesetError> {
        Ok(Self::new(ChangesetOptions::from_value(config)?))
    }

    /// Effective value of a field: the change if one is recorded (even
    /// `null`), otherwise the original.
    pub fn get_value(&self, field: &str) -> Option<&Value> {
        match self.changes.get(field) {
            Some(change) => Some(change),
            None => self.originals.get(field),
        }
    }

    /// Originals merged with changes, changes winning on shared keys.
    pub fn get_values(&self) -> Originals {
        let mut values = self.originals.clone();
        for (field, value) in &self.changes {
            values.insert(field.clone(), value.clone());
        }
        values
    }

    // ---- originals ----

    pub fn get_originals(&self) -> Originals {
        self.originals.clone()
    }

    pub fn get_original(&self, field: &str) -> Option<&Value> {
        self.originals.get(field)
    }

    pub fn set_original(&mut self, field: impl Into<String>, value: Value) {
        self.originals.insert(field.into(), value);
    }

    /// True when the field has an original, including a `null` one.
    pub fn has_original(&self, field: &str) -> bool {
        self.originals.contains_key(field)
    }

    pub fn set_originals(&mut self, originals: Originals) {
        tracing::debug!(fields = originals.len(), "replacing originals");
        self.originals = originals;
    }

    /// Replace all originals from untyped JSON, which must be an object.
    pub fn set_originals_value(&mut self, originals: &Value) -> Result<(), ChangesetError> {
        let map = validate_object("originals", Some(originals))?;
        self.set_originals(map.clone());
        Ok(())
    }

    // ---- changes ----

    pub fn get_changes(&self) -> Changes {
        self.changes.clone()
    }

    pub fn get_change(&self, field: &str) -> Option<&Value> {
        self.changes.get(field)
    }

    /// Record a change and notify change listeners.
    pub fn set_change(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        self.changes.insert(field.clone(), value.clone());
        listeners::notify_change(self, &field, &value);
    }

    /// True when a change is recorded for the field, including a `null` one.
    pub fn has_change(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    /// Replace all changes, then notify listeners once per field in
    /// insertion order.
    pub fn set_changes(&mut self, changes: Changes) {
        tracing::debug!(fields = changes.len(), "replacing changes");
        if self.listeners.count(ListenerKind::Change) == 0 {
            self.changes = changes;
            return;
        }
        let written = changes.clone();
        self.changes = changes;
        for (field, value) in &written {
            listeners::notify_change(self, field, value);
        }
    }

    /// Replace all changes from untyped JSON, which must be an object.
    pub fn set_changes_value(&mut self, changes: &Value) -> Result<(), ChangesetError> {
        let map = validate_object("changes", Some(changes))?;
        self.set_changes(map.clone());
        Ok(())
    }

    /// Drop every change. Listeners are not notified.
    pub fn clear_changes(&mut self) {
        tracing::trace!(cleared = self.changes.len(), "clearing changes");
        self.changes.clear();
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    // ---- field errors ----

    /// Errors recorded for a field; empty when none are recorded.
    pub fn get_errors(&self, field: &str) -> &[FieldError] {
        match self.errors.get(field) {
            Some(Some(list)) => list.as_slice(),
            _ => &[],
        }
    }

    pub fn set_errors(&mut self, field: impl Into<String>, errors: Vec<FieldError>) {
        self.errors.insert(field.into(), Some(errors));
    }

    /// Set a field's errors from an untyped JSON list of error objects.
    pub fn set_errors_value(&mut self, field: impl Into<String>, errors: &Value) -> Result<(), ChangesetError> {
        let field = field.into();
        let list = validate_error_list(&format!("errors.{field}"), errors)?;
        self.errors.insert(field, Some(list));
        Ok(())
    }

    /// Append an error to a field, starting a new list if none exists.
    pub fn add_error(&mut self, field: impl Into<String>, error: impl Into<FieldError>) {
        let entry = self.errors.entry(field.into()).or_insert(None);
        entry.get_or_insert_with(Vec::new).push(error.into());
    }

    pub fn add_error_value(&mut self, field: impl Into<String>, error: &Value) -> Result<(), ChangesetError> {
        let field = field.into();
        let error = validate_field_error(&format!("errors.{field}"), error)?;
        self.add_error(field, error);
        Ok(())
    }

    pub fn get_all_errors(&self) -> AllFieldErrors {
        self.errors.clone()
    }

    pub fn set_all_errors(&mut self, errors: AllFieldErrors) {
        tracing::debug!(fields = errors.len(), "replacing field errors");
        self.errors = errors;
    }

    /// Replace all field errors from untyped JSON: an object mapping each
    /// field to a list of error objects or `null`.
    pub fn set_all_errors_value(&mut self, errors: &Value) -> Result<(), ChangesetError> {
        let errors = validate_all_errors("errors", Some(errors))?;
        self.set_all_errors(errors);
        Ok(())
    }

    pub fn has_errors(&self, field: &str) -> bool {
        !self.get_errors(field).is_empty()
    }

    pub fn has_any_field_errors(&self) -> bool {
        self.errors.keys().any(|field| self.has_errors(field))
    }

    /// True when an error message is set or any field has errors.
    pub fn has_any_errors(&self) -> bool {
        self.has_error_message() || self.has_any_field_errors()
    }

    /// Remove a field's error entry entirely.
    pub fn clear_errors(&mut self, field: &str) {
        self.errors.shift_remove(field);
    }

    /// Remove every field error and the error message.
    pub fn clear_all_errors(&mut self) {
        tracing::trace!(cleared = self.errors.len(), "clearing all errors");
        self.errors.clear();
        self.error_message = None;
    }

    // ---- error message ----

    pub fn get_error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    pub fn set_error_message_value(&mut self, message: &Value) -> Result<(), ChangesetError> {
        self.error_message = validate_error_message("errorMessage", message)?;
        Ok(())
    }

    /// True when a message is set. An empty string still counts.
    pub fn has_error_message(&self) -> bool {
        self.error_message.is_some()
    }

    // ---- listeners ----

    /// Register a listener by kind name. The only kind is `"change"`.
    ///
    /// Listeners stay registered for the life of the changeset and run in
    /// registration order.
    pub fn listen<F>(&mut self, kind: &str, listener: F) -> Result<(), ChangesetError>
    where
        F: Fn(&str, &Value, &mut Changeset) -> Result<(), ListenerError> + 'static,
    {
        let kind: ListenerKind = kind.parse()?;
        self.listeners.add(kind, Rc::new(listener));
        Ok(())
    }

    /// Register a change listener.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: Fn(&str, &Value, &mut Changeset) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.add(ListenerKind::Change, Rc::new(listener));
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.count(kind)
    }
}
