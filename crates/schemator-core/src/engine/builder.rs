//! Builder for configuring a [`Schemator`]
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use super::Schemator;
use crate::error::{Error, ErrorKind, Result};
use crate::filter::{built_in, FilterContext, FilterRef, FilterRegistry};
use crate::mask::ErrorsLevelMask;
use crate::path::DEFAULT_DELIMITER;
use serde_json::Value;

/// Fluent assembly of delimiter, error policy and filters
pub struct SchematorBuilder {
    path_delimiter: String,
    errors_level_mask: ErrorsLevelMask,
    filters: FilterRegistry,
}

impl SchematorBuilder {
    /// Create a new builder with strict defaults
    pub fn new() -> Self {
        Self {
            path_delimiter: DEFAULT_DELIMITER.to_string(),
            errors_level_mask: ErrorsLevelMask::empty(),
            filters: FilterRegistry::new(),
        }
    }

    /// Set the path delimiter
    pub fn with_path_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.path_delimiter = delimiter.into();
        self
    }

    /// Set the error-tolerance mask
    pub fn with_errors_level_mask(mut self, mask: ErrorsLevelMask) -> Self {
        self.errors_level_mask = mask;
        self
    }

    /// Additionally tolerate one error category
    pub fn tolerate(mut self, kind: ErrorKind) -> Self {
        self.errors_level_mask.insert(kind);
        self
    }

    /// Register a filter
    pub fn with_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&Value, &FilterContext<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
        self
    }

    /// Register several shared filters at once
    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (S, FilterRef)>,
        S: Into<String>,
    {
        self.filters
            .extend(filters.into_iter().map(|(name, filter)| (name.into(), filter)));
        self
    }

    /// Register the built-in filter set
    pub fn with_built_in_filters(mut self) -> Self {
        built_in::register_all(&mut self.filters);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<Schemator> {
        if self.path_delimiter.is_empty() {
            return Err(Error::configuration("path delimiter must not be empty"));
        }

        log::debug!(
            "Schemator configured: delimiter '{}', tolerating [{}], {} filter(s)",
            self.path_delimiter,
            self.errors_level_mask,
            self.filters.len()
        );

        Ok(Schemator {
            path_delimiter: self.path_delimiter,
            errors_level_mask: self.errors_level_mask,
            filters: self.filters,
        })
    }
}

impl Default for SchematorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
