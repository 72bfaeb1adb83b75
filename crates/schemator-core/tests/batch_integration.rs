//! Integration tests for batch conversion

mod test_support;

use schemator_core::{ErrorKind, MassSchemator, Schemator};
use serde_json::{json, Value};
use std::cell::Cell;
use test_support::{engine, order, orders, schema};

#[test]
fn test_exec_converts_every_item_in_order() {
    let mass = MassSchemator::new(engine(&[ErrorKind::CannotGetValue]));
    let schema = schema(json!({"id": "id", "email": "customer.contact.email"}));

    let result = mass.exec(&orders(), &schema).unwrap();
    assert_eq!(
        result,
        vec![
            json!({"id": 1, "email": "ada@example.com"}),
            json!({"id": 2}),
            json!({"id": 3, "email": "cy@example.com"}),
        ]
    );
}

#[test]
fn test_exec_aborts_without_partial_results() {
    let mass = MassSchemator::new(engine(&[]));
    let schema = schema(json!({"id": "id", "email": "customer.contact.email"}));

    let err = mass.exec(orders(), &schema).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::CannotGetValue));
}

#[test]
fn test_exec_empty_input() {
    let mass = MassSchemator::from(Schemator::new());
    let schema = schema(json!({"id": "id"}));

    let result = mass.exec(Vec::<Value>::new(), &schema).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_generate_pulls_items_on_demand() {
    let pulled = Cell::new(0usize);
    let items = (1..).map(|id| {
        pulled.set(pulled.get() + 1);
        order(id, "Ada", &[])
    });

    let mass = MassSchemator::new(engine(&[]));
    let schema = schema(json!({"id": "id"}));
    let mut generator = mass.generate(items, &schema);

    assert_eq!(pulled.get(), 0);
    assert_eq!(generator.next().unwrap().unwrap(), json!({"id": 1}));
    assert_eq!(pulled.get(), 1);

    let next_two: Vec<Value> = generator.by_ref().take(2).map(Result::unwrap).collect();
    assert_eq!(next_two, vec![json!({"id": 2}), json!({"id": 3})]);
    assert_eq!(pulled.get(), 3);
    assert_eq!(generator.position(), 3);
}

#[test]
fn test_generate_is_fused_after_error() {
    let mass = MassSchemator::new(engine(&[]));
    let schema = schema(json!({"email": "customer.contact.email"}));
    let items = orders();

    let results: Vec<_> = mass.generate(&items, &schema).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().err().and_then(|e| e.kind()),
        Some(ErrorKind::CannotGetValue)
    );
}

#[test]
fn test_generate_borrows_or_owns_items() {
    let mass = MassSchemator::new(engine(&[]));
    let schema = schema(json!({"name": ["customer.name", "upper"]}));
    let items = orders();

    let borrowed: Vec<Value> = mass
        .generate(items.iter(), &schema)
        .collect::<Result<_, _>>()
        .unwrap();
    let owned: Vec<Value> = mass
        .generate(items.clone(), &schema)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(borrowed, owned);
    assert_eq!(borrowed[2], json!({"name": "CY"}));
}

#[test]
fn test_engine_shared_across_threads() {
    let mass = MassSchemator::new(engine(&[ErrorKind::CannotGetValue]));
    let schema = schema(json!({"id": "id", "lines": ["lines", "count"]}));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let mass = &mass;
                let schema = &schema;
                scope.spawn(move || {
                    let items: Vec<Value> = (0..10).map(|i| order(worker * 10 + i, "W", &[])).collect();
                    mass.exec(&items, schema).unwrap()
                })
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            assert_eq!(result.len(), 10);
            assert_eq!(result[0], json!({"id": worker * 10, "lines": 0}));
        }
    });
}
