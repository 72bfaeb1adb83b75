//! Delimited path resolution
//!
//! A path such as `"user.addresses.0.city"` is split by the engine's
//! delimiter and each segment is applied to the current value according to
//! its [`Shape`]: mappings are indexed by key, sequences by a non-negative
//! integer, and scalars cannot be descended into.
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Default path delimiter
pub const DEFAULT_DELIMITER: &str = ".";

/// Container shape of a value, as seen by the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Ordered key-value mapping; also how serialized structs appear
    Mapping(&'a Map<String, Value>),
    /// Integer-indexed sequence
    Sequence(&'a [Value]),
    /// Anything that cannot be descended into
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    /// Classify a value
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Shape::Mapping(map),
            Value::Array(items) => Shape::Sequence(items),
            other => Shape::Scalar(other),
        }
    }
}

/// Resolve `path` inside `source`, splitting it by `delimiter`.
///
/// Returns a borrow into `source`. Failures:
/// - empty path, empty segment, or non-index segment on a sequence:
///   [`Error::UnsupportedKeyType`]
/// - absent key or out-of-range index: [`Error::CannotGetValue`]
/// - a scalar reached before the last segment is consumed:
///   [`Error::UnsupportedSourceType`]
pub fn resolve<'a>(source: &'a Value, path: &str, delimiter: &str) -> Result<&'a Value> {
    if delimiter.is_empty() {
        return Err(Error::configuration("path delimiter must not be empty"));
    }
    if path.is_empty() {
        return Err(Error::unsupported_key_type(source, Value::String(String::new())));
    }

    let mut current = source;
    for segment in path.split(delimiter) {
        if segment.is_empty() {
            return Err(Error::unsupported_key_type(
                current,
                Value::String(path.to_string()),
            ));
        }

        current = match Shape::of(current) {
            Shape::Mapping(map) => map
                .get(segment)
                .ok_or_else(|| Error::cannot_get_value(current, path))?,
            Shape::Sequence(items) => {
                let index = parse_index(segment).ok_or_else(|| {
                    Error::unsupported_key_type(current, Value::String(path.to_string()))
                })?;
                index
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| Error::cannot_get_value(current, path))?
            }
            Shape::Scalar(value) => return Err(Error::unsupported_source_type(value, path)),
        };
    }

    Ok(current)
}

/// Parse a sequence index segment.
///
/// `None` when the segment is not a run of ASCII digits; `Some(None)` when
/// it is, but does not fit in `usize` (so it can only be out of range).
fn parse_index(segment: &str) -> Option<Option<usize>> {
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(segment.parse().ok())
}
