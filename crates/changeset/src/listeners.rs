//! Listener registry and change dispatch.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ListenerError;
use crate::types::ListenerKind;
use crate::Changeset;

/// Callback invoked after a change is written.
///
/// Receives the field, the written value and the changeset itself. The
/// changeset is passed mutably so a listener may write further changes;
/// nothing guards against a listener re-triggering itself. Only `Err`
/// results are isolated; a panicking listener unwinds through the caller.
pub type ChangeListener = dyn Fn(&str, &Value, &mut Changeset) -> Result<(), ListenerError>;

#[derive(Clone, Default)]
pub(crate) struct Listeners {
    by_kind: BTreeMap<ListenerKind, Vec<Rc<ChangeListener>>>,
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: ListenerKind, listener: Rc<ChangeListener>) {
        self.by_kind.entry(kind).or_default().push(listener);
    }

    pub(crate) fn count(&self, kind: ListenerKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Listeners registered for `kind` at this moment, in registration order.
    fn snapshot(&self, kind: ListenerKind) -> Vec<Rc<ChangeListener>> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, list) in &self.by_kind {
            map.entry(&kind.as_str(), &list.len());
        }
        map.finish()
    }
}

/// Run every change listener for one written field.
///
/// Each failure is logged and skipped so later listeners still run. Listeners
/// added while dispatching are not called for the current change.
pub(crate) fn notify_change(changeset: &mut Changeset, field: &str, value: &Value) {
    let listeners = changeset.listeners.snapshot(ListenerKind::Change);
    for (index, listener) in listeners.iter().enumerate() {
        if let Err(err) = listener(field, value, changeset) {
            tracing::warn!(field, listener = index, error = %err, "change listener failed");
        }
    }
}
