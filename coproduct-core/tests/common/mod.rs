// Test utilities and generators for coproduct property-based testing

#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::Value;

/// Generate a non-empty label that is never the fallback key
pub fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("some".to_string()),
        Just("none".to_string()),
        Just("ok".to_string()),
        Just("err".to_string()),
        Just("increBy".to_string()),
        "[a-z][a-zA-Z0-9]{0,8}",
    ]
}

/// Generate a set of pairwise-distinct labels
pub fn arb_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_label(), 1..8).prop_map(|set| set.into_iter().collect())
}

/// Generate distinct labels together with an index into them
pub fn arb_labels_and_pick() -> impl Strategy<Value = (Vec<String>, usize)> {
    arb_labels().prop_flat_map(|labels| {
        let len = labels.len();
        (Just(labels), 0..len)
    })
}

/// Generate a leaf JSON payload
pub fn arb_json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]*".prop_map(Value::String),
    ]
}

/// Generate a JSON payload with limited nesting
pub fn arb_json() -> impl Strategy<Value = Value> {
    arb_json_leaf().prop_recursive(2, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::Array)
    })
}
