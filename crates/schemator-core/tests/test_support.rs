//! Shared test support utilities for integration tests

#![allow(dead_code)]

use schemator_core::{ErrorKind, Schema, Schemator, SchematorBuilder};
use serde_json::{json, Value};

/// A catalog-style record with nested objects, lists and a timestamp
pub fn order(id: u64, customer: &str, items: &[(&str, u64, f64)]) -> Value {
    let lines: Vec<Value> = items
        .iter()
        .map(|(sku, qty, price)| json!({"sku": sku, "qty": qty, "price": price}))
        .collect();

    json!({
        "id": id,
        "customer": {
            "name": customer,
            "contact": {"email": format!("{}@example.com", customer.to_lowercase())}
        },
        "lines": lines,
        "tags": ["retail", "web"],
        "created": 1_700_000_000 + id as i64
    })
}

/// Several orders, the second one without a contact email
pub fn orders() -> Vec<Value> {
    let mut second = order(2, "Bob", &[("B-1", 1, 10.0)]);
    if let Some(customer) = second["customer"].as_object_mut() {
        customer.remove("contact");
    }

    vec![
        order(1, "Ada", &[("A-1", 2, 5.5), ("A-2", 1, 3.0)]),
        second,
        order(3, "Cy", &[]),
    ]
}

/// Engine with the built-in filters and the given tolerated categories
pub fn engine(tolerate: &[ErrorKind]) -> Schemator {
    tolerate
        .iter()
        .fold(SchematorBuilder::new().with_built_in_filters(), |builder, kind| {
            builder.tolerate(*kind)
        })
        .build()
        .expect("engine should build")
}

/// Parse a schema from its JSON form
pub fn schema(value: Value) -> Schema {
    serde_json::from_value(value).expect("schema should parse")
}

/// Keys of a converted object in output order
pub fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default()
}
