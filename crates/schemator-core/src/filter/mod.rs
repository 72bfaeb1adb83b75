//! Filter protocol, registry and chain invocation
//!
//! A filter is a named function from a resolved value to a new value. It
//! receives a [`FilterContext`] with its explicit arguments, the root source
//! of the running conversion and the engine itself, so filters may resolve
//! further paths.
//!
//! # Module Organization
//!
//! - [`invoker`] - threads a value through a filter chain
//! - [`built_in`] - common filters ready to register
//!
//! # Examples
//!
//! ```
//! use schemator_core::{FilterContext, FilterRegistry};
//! use serde_json::{json, Value};
//!
//! let mut registry = FilterRegistry::new();
//! registry.register("double", |value: &Value, _ctx: &FilterContext<'_>| {
//!     let n = value.as_i64().ok_or_else(|| anyhow::anyhow!("not an integer"))?;
//!     Ok(json!(n * 2))
//! });
//!
//! assert!(registry.contains("double"));
//! assert!(!registry.contains("triple"));
//! ```
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod invoker;


use crate::engine::Schemator;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named value transformation
pub trait Filter: Send + Sync {
    /// Transform `value`. Any error is wrapped by the engine as a filter
    /// error, except engine [`Error`]s, which keep their own category.
    fn apply(&self, value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value>;
}

impl<F> Filter for F
where
    F: Fn(&Value, &FilterContext<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    fn apply(&self, value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
        self(value, ctx)
    }
}

/// Shared handle to a registered filter
pub type FilterRef = Arc<dyn Filter>;

/// Context information available to filters
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    /// Name the filter was invoked under
    pub name: &'a str,
    /// Explicit arguments from the filter config
    pub args: &'a [Value],
    /// Root source of the running conversion
    pub source: &'a Value,
    /// Engine running the conversion
    pub engine: &'a Schemator,
}

impl<'a> FilterContext<'a> {
    /// Argument at `index`, if given
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// String argument at `index`, if given and a string
    pub fn arg_str(&self, index: usize) -> Option<&'a str> {
        self.arg(index).and_then(Value::as_str)
    }

    /// Resolve `path` inside `value` with the engine's delimiter
    pub fn get<'v>(&self, value: &'v Value, path: &str) -> Result<&'v Value> {
        self.engine.get(value, path)
    }
}

impl fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Mapping from filter name to filter
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterRef>,
}

impl FilterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure or function; an existing filter of the same name is replaced
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, &FilterContext<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register_ref(name, Arc::new(filter));
    }

    /// Register a shared filter; an existing filter of the same name is replaced
    pub fn register_ref(&mut self, name: impl Into<String>, filter: FilterRef) {
        let name = name.into();
        if self.filters.insert(name.clone(), filter).is_some() {
            log::debug!("Filter '{}' re-registered, previous definition replaced", name);
        }
    }

    /// Check whether a filter is registered
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Look up a filter
    pub fn get(&self, name: &str) -> Result<&FilterRef> {
        self.filters.get(name).ok_or_else(|| Error::FilterNotFound {
            filter: name.to_string(),
        })
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Extend<(String, FilterRef)> for FilterRegistry {
    fn extend<I: IntoIterator<Item = (String, FilterRef)>>(&mut self, iter: I) {
        for (name, filter) in iter {
            self.register_ref(name, filter);
        }
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}
