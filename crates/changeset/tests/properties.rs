use changeset::{Changes, Changeset, FieldError, Originals};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn arb_map() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-e]", arb_value()), 0..6).prop_map(|pairs| pairs.into_iter().collect())
}

fn build(originals: Originals, changes: Changes) -> Changeset {
    let mut changeset = Changeset::default();
    changeset.set_originals(originals);
    changeset.set_changes(changes);
    changeset
}

proptest! {
    /// A written change is visible through `has_change` and `get_value`,
    /// whatever the value.
    #[test]
    fn set_change_shadows(originals in arb_map(), field in "[a-e]", value in arb_value()) {
        let mut cs = build(originals, Changes::new());
        cs.set_change(field.clone(), value.clone());
        prop_assert!(cs.has_change(&field));
        prop_assert_eq!(cs.get_value(&field), Some(&value));
    }

    /// `get_value` reads the change when present and the original otherwise.
    #[test]
    fn get_value_falls_back(originals in arb_map(), changes in arb_map(), field in "[a-f]") {
        let cs = build(originals, changes);
        let expected = if cs.has_change(&field) {
            cs.get_change(&field)
        } else {
            cs.get_original(&field)
        };
        prop_assert_eq!(cs.get_value(&field), expected);
    }

    /// `get_values` is the key-wise union, changes winning.
    #[test]
    fn get_values_is_union(originals in arb_map(), changes in arb_map()) {
        let cs = build(originals.clone(), changes.clone());
        let values = cs.get_values();

        for (field, value) in &values {
            let expected = changes.get(field).or_else(|| originals.get(field));
            prop_assert_eq!(Some(value), expected);
        }
        for field in originals.keys().chain(changes.keys()) {
            prop_assert!(values.contains_key(field));
        }
    }

    /// Returned originals are equal to what was set and detached from state.
    #[test]
    fn originals_copy_is_independent(originals in arb_map()) {
        let mut cs = Changeset::default();
        cs.set_originals(originals.clone());

        let mut copy = cs.get_originals();
        prop_assert_eq!(&copy, &originals);
        copy.insert("zz".into(), Value::Bool(true));
        copy.clear();
        prop_assert_eq!(cs.get_originals(), originals);
    }

    /// `add_error` appends in order, starting from nothing.
    #[test]
    fn add_error_preserves_order(messages in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let mut cs = Changeset::default();
        for message in &messages {
            cs.add_error("field", message.as_str());
        }
        let expected: Vec<FieldError> = messages.iter().map(|m| FieldError::new(m.as_str())).collect();
        prop_assert_eq!(cs.get_errors("field"), expected.as_slice());
        prop_assert!(cs.has_errors("field"));
    }
}
