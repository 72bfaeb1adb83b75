//! Conversion engine
//!
//! [`Schemator`] interprets a [`Schema`] against a source value. Every output
//! key is produced independently: its path is resolved, an optional nested
//! schema is applied, its filter chain runs, and any failure is either
//! propagated or, when the [`ErrorsLevelMask`] tolerates its category,
//! turned into an omitted key.
//!
//! # Examples
//!
//! ```
//! use schemator_core::{ErrorKind, ErrorsLevelMask, Rule, Schema, SchematorBuilder};
//! use serde_json::json;
//!
//! let schemator = SchematorBuilder::new()
//!     .with_errors_level_mask(ErrorsLevelMask::empty().with(ErrorKind::CannotGetValue))
//!     .with_built_in_filters()
//!     .build()
//!     .unwrap();
//!
//! let schema = Schema::new()
//!     .with("name", Rule::new("user.name").filter("upper"))
//!     .with("email", "user.email");
//!
//! let result = schemator.convert(&json!({"user": {"name": "ada"}}), &schema).unwrap();
//! assert_eq!(result, json!({"name": "ADA"}));
//! ```
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod mass;



use crate::error::{Error, Result};
use crate::filter::{invoker, FilterContext, FilterRegistry};
use crate::mask::ErrorsLevelMask;
use crate::path::{self, DEFAULT_DELIMITER};
use crate::schema::{FilterConfig, PathKey, Schema, SchemaEntry};
use serde::Serialize;
use serde_json::{Map, Value};

pub use builder::SchematorBuilder;
pub use mass::{Generate, MassSchemator};

/// Schema-driven converter
#[derive(Debug, Clone)]
pub struct Schemator {
    path_delimiter: String,
    errors_level_mask: ErrorsLevelMask,
    filters: FilterRegistry,
}

impl Default for Schemator {
    fn default() -> Self {
        Self {
            path_delimiter: DEFAULT_DELIMITER.to_string(),
            errors_level_mask: ErrorsLevelMask::default(),
            filters: FilterRegistry::new(),
        }
    }
}

impl Schemator {
    /// Create a strict engine with the default delimiter and no filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring an engine
    pub fn builder() -> SchematorBuilder {
        SchematorBuilder::new()
    }

    pub fn path_delimiter(&self) -> &str {
        &self.path_delimiter
    }

    /// Change the path delimiter; it must not be empty
    pub fn set_path_delimiter(&mut self, delimiter: impl Into<String>) -> Result<()> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(Error::configuration("path delimiter must not be empty"));
        }
        self.path_delimiter = delimiter;
        Ok(())
    }

    pub fn errors_level_mask(&self) -> ErrorsLevelMask {
        self.errors_level_mask
    }

    /// Replace the error-tolerance policy for subsequent conversions
    pub fn set_errors_level_mask(&mut self, mask: ErrorsLevelMask) {
        self.errors_level_mask = mask;
    }

    /// Register a filter, replacing any filter of the same name
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, &FilterContext<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    /// Resolve `path` inside `source` with the configured delimiter
    pub fn get<'a>(&self, source: &'a Value, path: &str) -> Result<&'a Value> {
        path::resolve(source, path, &self.path_delimiter)
    }

    /// Convert `source` according to `schema`.
    ///
    /// Returns an object whose keys follow the schema's order, minus keys
    /// whose failures the errors level mask tolerates.
    pub fn convert(&self, source: &Value, schema: &Schema) -> Result<Value> {
        self.convert_schema(source, schema, source).map(Value::Object)
    }

    /// Serialize `source` and convert it; structs become mappings of their fields
    pub fn convert_serializable<T>(&self, source: &T, schema: &Schema) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(source)?;
        self.convert(&value, schema)
    }

    /// Run a filter chain over `value` with `source` as the root context
    pub fn apply_filters(&self, value: Value, chain: &[FilterConfig], source: &Value) -> Result<Value> {
        invoker::apply_chain(self, value, chain, source)
    }

    fn convert_schema(&self, current: &Value, schema: &Schema, root: &Value) -> Result<Map<String, Value>> {
        let mut result = Map::new();

        for (key, entry) in schema.iter() {
            match self.convert_entry(current, entry, root) {
                Ok(value) => {
                    result.insert(key.to_string(), value);
                }
                Err(err) if self.errors_level_mask.tolerates(&err) => {
                    log::debug!(
                        "Omitting key '{}' ({}): {}",
                        key,
                        err.kind().map(|k| k.as_str()).unwrap_or("unknown"),
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(result)
    }

    fn convert_entry(&self, current: &Value, entry: &SchemaEntry, root: &Value) -> Result<Value> {
        match entry {
            SchemaEntry::Path(path) => self.resolve_key(current, path).cloned(),
            SchemaEntry::Nested(schema) => self.convert_schema(current, schema, root).map(Value::Object),
            SchemaEntry::Rule(rule) => {
                let resolved = self.resolve_key(current, &rule.path)?;
                let value = match &rule.schema {
                    Some(schema) => Value::Object(self.convert_schema(resolved, schema, root)?),
                    None => resolved.clone(),
                };
                self.apply_filters(value, &rule.filters, root)
            }
        }
    }

    fn resolve_key<'a>(&self, current: &'a Value, key: &PathKey) -> Result<&'a Value> {
        match key {
            PathKey::Whole => Ok(current),
            PathKey::Path(path) => self.get(current, path),
            PathKey::Unsupported(raw) => Err(Error::unsupported_key_type(current, raw.clone())),
        }
    }
}
