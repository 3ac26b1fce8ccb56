//! Construction options for [`Changeset`](crate::Changeset).

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::error::{ChangesetError, ListenerError};
use crate::listeners::ChangeListener;
use crate::types::{AllFieldErrors, Changes, Originals};
use crate::validate::{validate_all_errors, validate_error_message, validate_object};
use crate::Changeset;

/// Initial state for a changeset.
///
/// Every part is optional; omitted stores start empty and the error message
/// starts as `None`.
///
/// # Example
///
/// ```
/// use changeset::{Changeset, ChangesetOptions};
/// use serde_json::json;
///
/// let options = ChangesetOptions::from_value(json!({
///     "originals": {"name": "Ada"},
///     "changes": {"name": "Grace"},
/// }))
/// .unwrap();
/// let changeset = Changeset::new(options);
/// assert_eq!(changeset.get_value("name"), Some(&json!("Grace")));
/// ```
#[derive(Default)]
pub struct ChangesetOptions {
    pub originals: Originals,
    pub changes: Changes,
    pub errors: AllFieldErrors,
    pub error_message: Option<String>,
    pub(crate) on_change: Option<Rc<ChangeListener>>,
}

impl ChangesetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn originals(mut self, originals: Originals) -> Self {
        self.originals = originals;
        self
    }

    pub fn changes(mut self, changes: Changes) -> Self {
        self.changes = changes;
        self
    }

    pub fn errors(mut self, errors: AllFieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Register the initial change listener.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str, &Value, &mut Changeset) -> Result<(), ListenerError> + 'static,
    {
        self.on_change = Some(Rc::new(listener));
        self
    }

    /// Build options from untyped JSON configuration.
    ///
    /// Recognized keys are `originals`, `changes`, `errors` and
    /// `errorMessage`; other keys are ignored. A present key is validated
    /// even when it is `null`, so `{"originals": null}` is rejected while a
    /// missing `originals` falls back to an empty store. A `null` document is
    /// treated as empty configuration.
    pub fn from_value(config: Value) -> Result<Self, ChangesetError> {
        if config.is_null() {
            return Ok(Self::default());
        }
        let obj = validate_object("options", Some(&config))?;
        let mut options = Self::default();
        if let Some(value) = obj.get("originals") {
            options.originals = validate_object("originals", Some(value))?.clone();
        }
        if let Some(value) = obj.get("changes") {
            options.changes = validate_object("changes", Some(value))?.clone();
        }
        if let Some(value) = obj.get("errors") {
            options.errors = validate_all_errors("errors", Some(value))?;
        }
        if let Some(value) = obj.get("errorMessage") {
            options.error_message = validate_error_message("errorMessage", value)?;
        }
        Ok(options)
    }

    /// Parse JSON text, then validate it like [`ChangesetOptions::from_value`].
    pub fn from_json_str(text: &str) -> Result<Self, ChangesetError> {
        let config: Value = serde_json::from_str(text)?;
        Self::from_value(config)
    }
}

impl fmt::Debug for ChangesetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangesetOptions")
            .field("originals", &self.originals)
            .field("changes", &self.changes)
            .field("errors", &self.errors)
            .field("error_message", &self.error_message)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldError;
    use serde_json::json;

    fn config_err(config: Value) -> String {
        ChangesetOptions::from_value(config).unwrap_err().to_string()
    }

    #[test]
    fn test_from_value_reads_all_keys() {
        let options = ChangesetOptions::from_value(json!({
            "originals": {"test": "original"},
            "changes": {"test": "change"},
            "errors": {"test": [{"message": "Error"}]},
            "errorMessage": "Oops",
            "unrelated": 42,
        }))
        .unwrap();

        assert_eq!(options.originals.get("test"), Some(&json!("original")));
        assert_eq!(options.changes.get("test"), Some(&json!("change")));
        assert_eq!(options.errors.get("test"), Some(&Some(vec![FieldError::new("Error")])));
        assert_eq!(options.error_message.as_deref(), Some("Oops"));
        assert!(options.on_change.is_none());
    }

    #[test]
    fn test_from_value_defaults() {
        for config in [json!({}), json!(null)] {
            let options = ChangesetOptions::from_value(config).unwrap();
            assert!(options.originals.is_empty());
            assert!(options.changes.is_empty());
            assert!(options.errors.is_empty());
            assert_eq!(options.error_message, None);
        }
    }

    #[test]
    fn test_from_value_rejects_bad_originals() {
        assert!(config_err(json!({"originals": "bad"})).contains("must be an object"));
        assert!(config_err(json!({"originals": 123})).contains("must be an object"));
        assert!(config_err(json!({"originals": true})).contains("must be an object"));
        assert!(config_err(json!({"originals": []})).contains("can't be an array"));
        assert!(config_err(json!({"originals": null})).contains("can't be null"));
    }

    #[test]
    fn test_from_value_rejects_bad_changes() {
        assert!(config_err(json!({"changes": "bad"})).contains("changes must be an object"));
        assert!(config_err(json!({"changes": []})).contains("changes can't be an array"));
    }

    #[test]
    fn test_from_value_rejects_bad_errors() {
        assert!(config_err(json!({"errors": []})).contains("can't be an array"));
        assert!(config_err(json!({"errors": {"x": 123}})).contains("must be an array"));
        assert!(config_err(json!({"errors": {"x": [{}]}})).contains("must have a message property"));
        assert!(config_err(json!({"errors": {"x": [{"message": 1}]}})).contains("message must be a string"));
    }

    #[test]
    fn test_from_value_rejects_bad_error_message() {
        for bad in [json!(true), json!(123), json!({}), json!([])] {
            assert!(config_err(json!({"errorMessage": bad})).contains("must be a string or null"));
        }
    }

    #[test]
    fn test_from_value_rejects_non_object_config() {
        assert_eq!(
            config_err(json!([1, 2])),
            "invalid changeset input: options can't be an array"
        );
    }

    #[test]
    fn test_from_json_str() {
        let options = ChangesetOptions::from_json_str(r#"{"changes": {"a": 1}}"#).unwrap();
        assert_eq!(options.changes.get("a"), Some(&json!(1)));

        let err = ChangesetOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ChangesetError::Json(_)));
    }

    #[test]
    fn test_builder() {
        let mut originals = Originals::new();
        originals.insert("a".into(), json!(1));
        let options = ChangesetOptions::new()
            .originals(originals)
            .error_message("bad")
            .on_change(|_, _, _| Ok(()));
        assert_eq!(options.originals.get("a"), Some(&json!(1)));
        assert_eq!(options.error_message.as_deref(), Some("bad"));
        assert!(format!("{options:?}").contains("on_change: true"));
    }
}
