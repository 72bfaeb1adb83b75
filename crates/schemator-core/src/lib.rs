//! Schemator Core - schema-driven value extraction and transformation
//!
//! This crate converts arbitrary nested data into a caller-defined shape. A
//! declarative [`Schema`] names, for every output key, a delimited path into
//! the source, an optional nested schema and a chain of named filters.
//!
//! # Main Components
//!
//! - **Path Resolver**: [`path::resolve`] walks mappings and sequences by a delimited path
//! - **Filters**: the [`Filter`] protocol, [`FilterRegistry`] and the built-in set
//! - **Conversion Engine**: [`Schemator`] applies a schema to one source value
//! - **Error Policy**: [`ErrorsLevelMask`] selects which failures omit a key instead of aborting
//! - **Batch Adapter**: [`MassSchemator`] converts whole collections lazily or eagerly
//!
//! # Example
//!
//! ```
//! use schemator_core::{MassSchemator, Result, Schema, SchematorBuilder};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let schemator = SchematorBuilder::new().with_built_in_filters().build()?;
//!     let schema: Schema = serde_json::from_value(json!({
//!         "id": "id",
//!         "city": "address.city",
//!         "tags": ["tags", ["implode", ", "]]
//!     }))?;
//!
//!     let rows = vec![
//!         json!({"id": 1, "address": {"city": "Oslo"}, "tags": ["a", "b"]}),
//!         json!({"id": 2, "address": {"city": "Rome"}, "tags": []}),
//!     ];
//!
//!     let converted = MassSchemator::new(schemator).exec(&rows, &schema)?;
//!     assert_eq!(converted[0], json!({"id": 1, "city": "Oslo", "tags": "a, b"}));
//!     assert_eq!(converted[1]["tags"], "");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod filter;
pub mod mask;
pub mod path;
pub mod schema;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use engine::{Generate, MassSchemator, Schemator, SchematorBuilder};
pub use error::{Error, ErrorKind, Result};
pub use filter::{built_in, Filter, FilterContext, FilterRef, FilterRegistry};
pub use mask::ErrorsLevelMask;
pub use schema::{FilterConfig, PathKey, Rule, Schema, SchemaEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
