//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random source
//! values, paths and flat schemas for property testing.

#![cfg(test)]

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating map keys safe to use as path segments
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for generating JSON values with controlled depth
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        24, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::vec((key_strategy(), inner), 0..5)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
            ]
        },
    )
}

/// Strategy for generating delimited paths of one to four segments
pub fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![key_strategy(), (0usize..4).prop_map(|i| i.to_string())],
        1..4,
    )
    .prop_map(|segments| segments.join("."))
}

/// Strategy for generating a flat object of scalar fields
pub fn flat_record_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::vec(
        (
            key_strategy(),
            prop_oneof![
                any::<i64>().prop_map(|n| Value::Number(n.into())),
                "[a-z]{0,10}".prop_map(Value::String),
            ],
        ),
        1..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}
