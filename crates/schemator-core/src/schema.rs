//! Declarative conversion schemas
//!
//! A [`Schema`] is an ordered list of output keys, each paired with a
//! [`SchemaEntry`] describing where its value comes from. Schemas can be
//! built in code or deserialized from JSON/YAML:
//!
//! ```
//! use schemator_core::{Schema, SchemaEntry, Rule};
//! use serde_json::json;
//!
//! let parsed: Schema = serde_json::from_value(json!({
//!     "id": "user.id",
//!     "name": ["user.name", "trim", ["replace", "\\s+", " "]],
//!     "city": {"path": "user.address", "schema": {"name": "city"}},
//!     "meta": {"source": "origin"}
//! })).unwrap();
//!
//! let built = Schema::new()
//!     .with("id", "user.id")
//!     .with("name", Rule::new("user.name")
//!         .filter("trim")
//!         .filter_with("replace", vec![json!("\\s+"), json!(" ")]))
//!     .with("city", Rule::new("user.address").schema(Schema::new().with("name", "city")))
//!     .with("meta", Schema::new().with("source", "origin"));
//!
//! assert_eq!(parsed, built);
//! ```
//!
//! Serialized forms of an entry:
//!
//! - `"a.b.c"` is a path; a non-negative integer is a one-segment path and
//!   `null` stands for the whole current value
//! - `[path, filter, filter, ...]` is a rule; the first element may also be
//!   `null` or a nested schema object
//! - an object whose keys are all among `path`, `schema`, `filter`,
//!   `filters` is a rule
//! - any other object is a nested schema applied to the current value
//!
//! Path components and filter configs of unexpected shapes are kept as-is so
//! that the engine can report them per key under its error policy.
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use crate::error::{type_name, Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

const RULE_KEYS: [&str; 4] = ["path", "schema", "filter", "filters"];

/// Ordered mapping from output key to schema entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Schema {
    entries: Vec<(String, SchemaEntry)>,
}

/// How the value of one output key is produced
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    /// Value found at a path inside the current source
    Path(PathKey),
    /// Sub-schema applied to the current source
    Nested(Schema),
    /// Path and/or nested schema followed by a filter chain
    Rule(Rule),
}

/// Path component of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum PathKey {
    /// The current value itself
    Whole,
    /// Delimited path
    Path(String),
    /// A key of a shape that cannot address anything
    Unsupported(Value),
}

/// One step of a filter chain
#[derive(Debug, Clone, PartialEq)]
pub enum FilterConfig {
    /// Named filter invocation with explicit arguments
    Call { name: String, args: Vec<Value> },
    /// Config of a shape the engine does not understand
    Unsupported(Value),
}

/// Path, optional nested schema and filter chain for one output key
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Where to read the value from
    pub path: PathKey,
    /// Sub-schema applied to the resolved value before filtering
    pub schema: Option<Schema>,
    /// Filters applied left to right
    pub filters: Vec<FilterConfig>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous entry under the same key in place
    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<SchemaEntry>) {
        let key = key.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, entry: impl Into<SchemaEntry>) -> Self {
        self.insert(key, entry);
        self
    }

    /// Look up the entry of an output key
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Output keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a schema from a JSON object
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let mut schema = Self::new();
        for (key, value) in map {
            schema.insert(key, SchemaEntry::try_from(value)?);
        }
        Ok(schema)
    }

    /// Serialize back into the canonical JSON form
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, e)| (k.clone(), e.to_value()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for Schema {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(Error::configuration(format!(
                "schema must be an object, found {}",
                type_name(&other)
            ))),
        }
    }
}

impl<K, E> FromIterator<(K, E)> for Schema
where
    K: Into<String>,
    E: Into<SchemaEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut schema = Self::new();
        for (key, entry) in iter {
            schema.insert(key, entry);
        }
        schema
    }
}

impl SchemaEntry {
    /// Entry reading the whole current value
    pub fn whole() -> Self {
        SchemaEntry::Path(PathKey::Whole)
    }

    /// Canonical JSON form of the entry
    pub fn to_value(&self) -> Value {
        match self {
            SchemaEntry::Path(path) => path.to_value(),
            SchemaEntry::Nested(schema) => schema.to_value(),
            SchemaEntry::Rule(rule) => rule.to_value(),
        }
    }
}

impl TryFrom<Value> for SchemaEntry {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) if is_rule_object(&map) => Ok(SchemaEntry::Rule(Rule::from_object(map)?)),
            Value::Object(map) => Ok(SchemaEntry::Nested(Schema::from_map(map)?)),
            Value::Array(items) => Ok(SchemaEntry::Rule(Rule::from_array(items)?)),
            other => Ok(SchemaEntry::Path(PathKey::from(other))),
        }
    }
}

fn is_rule_object(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| RULE_KEYS.contains(&k.as_str()))
}

impl From<&str> for SchemaEntry {
    fn from(path: &str) -> Self {
        SchemaEntry::Path(PathKey::from(path))
    }
}

impl From<String> for SchemaEntry {
    fn from(path: String) -> Self {
        SchemaEntry::Path(PathKey::from(path))
    }
}

impl From<PathKey> for SchemaEntry {
    fn from(path: PathKey) -> Self {
        SchemaEntry::Path(path)
    }
}

impl From<Schema> for SchemaEntry {
    fn from(schema: Schema) -> Self {
        SchemaEntry::Nested(schema)
    }
}

impl From<Rule> for SchemaEntry {
    fn from(rule: Rule) -> Self {
        SchemaEntry::Rule(rule)
    }
}

impl PathKey {
    fn to_value(&self) -> Value {
        match self {
            PathKey::Whole => Value::Null,
            PathKey::Path(path) => Value::String(path.clone()),
            PathKey::Unsupported(raw) => raw.clone(),
        }
    }
}

impl From<&str> for PathKey {
    fn from(path: &str) -> Self {
        PathKey::Path(path.to_string())
    }
}

impl From<String> for PathKey {
    fn from(path: String) -> Self {
        PathKey::Path(path)
    }
}

impl From<Value> for PathKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PathKey::Whole,
            Value::String(path) => PathKey::Path(path),
            Value::Number(n) if n.is_u64() => PathKey::Path(n.to_string()),
            other => PathKey::Unsupported(other),
        }
    }
}

impl FilterConfig {
    /// Filter invocation without arguments
    pub fn named(name: impl Into<String>) -> Self {
        FilterConfig::Call {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Filter invocation with explicit arguments
    pub fn with_args(name: impl Into<String>, args: Vec<Value>) -> Self {
        FilterConfig::Call {
            name: name.into(),
            args,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            FilterConfig::Call { name, args } if args.is_empty() => Value::String(name.clone()),
            FilterConfig::Call { name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                Value::Array(items)
            }
            FilterConfig::Unsupported(raw) => raw.clone(),
        }
    }
}

impl From<Value> for FilterConfig {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => FilterConfig::named(name),
            Value::Array(items) => match items.split_first() {
                Some((Value::String(name), args)) => FilterConfig::with_args(name.clone(), args.to_vec()),
                _ => FilterConfig::Unsupported(Value::Array(items)),
            },
            Value::Object(map) if is_call_object(&map) => {
                let name = map.get("name").and_then(Value::as_str).unwrap_or_default();
                let args = match map.get("args") {
                    Some(Value::Array(args)) => args.clone(),
                    _ => Vec::new(),
                };
                FilterConfig::with_args(name, args)
            }
            other => FilterConfig::Unsupported(other),
        }
    }
}

fn is_call_object(map: &Map<String, Value>) -> bool {
    let named = map.get("name").is_some_and(Value::is_string);
    let args_ok = map.get("args").map_or(true, Value::is_array);
    let no_extra = map.keys().all(|k| k == "name" || k == "args");
    named && args_ok && no_extra
}

impl Rule {
    /// Rule reading `path`
    pub fn new(path: impl Into<PathKey>) -> Self {
        Self {
            path: path.into(),
            schema: None,
            filters: Vec::new(),
        }
    }

    /// Rule reading the whole current value
    pub fn whole() -> Self {
        Self::new(PathKey::Whole)
    }

    /// Apply a nested schema to the resolved value
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Append a filter without arguments
    pub fn filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(FilterConfig::named(name));
        self
    }

    /// Append a filter with arguments
    pub fn filter_with(mut self, name: impl Into<String>, args: Vec<Value>) -> Self {
        self.filters.push(FilterConfig::with_args(name, args));
        self
    }

    /// Append a prepared filter config
    pub fn config(mut self, config: FilterConfig) -> Self {
        self.filters.push(config);
        self
    }

    fn from_array(items: Vec<Value>) -> Result<Self> {
        let mut items = items.into_iter();
        let mut rule = match items.next() {
            None => Rule::whole(),
            Some(Value::Object(map)) => Rule::whole().schema(Schema::from_map(map)?),
            Some(first) => Rule::new(PathKey::from(first)),
        };
        rule.filters.extend(items.map(FilterConfig::from));
        Ok(rule)
    }

    fn from_object(mut map: Map<String, Value>) -> Result<Self> {
        let mut rule = Rule::new(map.remove("path").map_or(PathKey::Whole, PathKey::from));

        match map.remove("schema") {
            None | Some(Value::Null) => {}
            Some(Value::Object(schema)) => rule.schema = Some(Schema::from_map(schema)?),
            Some(other) => {
                return Err(Error::configuration(format!(
                    "'schema' of a rule must be an object, found {}",
                    type_name(&other)
                )))
            }
        }

        if let Some(filter) = map.remove("filter") {
            rule.filters.push(FilterConfig::from(filter));
        }

        match map.remove("filters") {
            None | Some(Value::Null) => {}
            Some(Value::Array(chain)) => rule.filters.extend(chain.into_iter().map(FilterConfig::from)),
            Some(other) => {
                return Err(Error::configuration(format!(
                    "'filters' of a rule must be an array, found {}",
                    type_name(&other)
                )))
            }
        }

        Ok(rule)
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        if self.path != PathKey::Whole {
            map.insert("path".to_string(), self.path.to_value());
        }
        if let Some(schema) = &self.schema {
            map.insert("schema".to_string(), schema.to_value());
        }
        if !self.filters.is_empty() {
            map.insert(
                "filters".to_string(),
                Value::Array(self.filters.iter().map(FilterConfig::to_value).collect()),
            );
        }
        if map.is_empty() {
            // an empty object would parse back as an empty nested schema
            return Value::Array(Vec::new());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Schema {
        Schema::try_from(value).unwrap()
    }

    #[test]
    fn test_path_entries() {
        let schema = parse(json!({"a": "x.y", "b": 3, "c": null}));
        assert_eq!(schema.get("a"), Some(&SchemaEntry::from("x.y")));
        assert_eq!(schema.get("b"), Some(&SchemaEntry::from("3")));
        assert_eq!(schema.get("c"), Some(&SchemaEntry::whole()));
    }

    #[test]
    fn test_unsupported_path_keys_are_kept() {
        let schema = parse(json!({"a": -1, "b": true, "c": 1.5}));
        for key in ["a", "b", "c"] {
            assert!(matches!(
                schema.get(key),
                Some(SchemaEntry::Path(PathKey::Unsupported(_)))
            ));
        }
    }

    #[test]
    fn test_key_order_is_preserved() {
        let schema = parse(json!({"z": "1", "a": "2", "m": "3"}));
        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_array_rule() {
        let schema = parse(json!({"n": ["name", "trim", ["replace", "a", "b"], 42]}));
        let expected = Rule::new("name")
            .filter("trim")
            .filter_with("replace", vec![json!("a"), json!("b")])
            .config(FilterConfig::Unsupported(json!(42)));
        assert_eq!(schema.get("n"), Some(&SchemaEntry::Rule(expected)));
    }

    #[test]
    fn test_array_rule_without_path() {
        let schema = parse(json!({"n": [null, "count"], "m": [{"x": "a"}, "flatten"], "e": []}));
        assert_eq!(
            schema.get("n"),
            Some(&SchemaEntry::Rule(Rule::whole().filter("count")))
        );
        assert_eq!(
            schema.get("m"),
            Some(&SchemaEntry::Rule(
                Rule::whole().schema(Schema::new().with("x", "a")).filter("flatten")
            ))
        );
        assert_eq!(schema.get("e"), Some(&SchemaEntry::Rule(Rule::whole())));
    }

    #[test]
    fn test_object_rule() {
        let schema = parse(json!({
            "n": {"path": "name", "filter": "upper"},
            "m": {"path": "a", "schema": {"city": "b.c"}, "filters": ["lower", {"name": "replace", "args": ["x", "y"]}]},
            "w": {"filter": ["const", 1]}
        }));
        assert_eq!(
            schema.get("n"),
            Some(&SchemaEntry::Rule(Rule::new("name").filter("upper")))
        );
        assert_eq!(
            schema.get("m"),
            Some(&SchemaEntry::Rule(
                Rule::new("a")
                    .schema(Schema::new().with("city", "b.c"))
                    .filter("lower")
                    .filter_with("replace", vec![json!("x"), json!("y")])
            ))
        );
        assert_eq!(
            schema.get("w"),
            Some(&SchemaEntry::Rule(Rule::whole().filter_with("const", vec![json!(1)])))
        );
    }

    #[test]
    fn test_nested_schema() {
        let schema = parse(json!({"addr": {"city": "a.b.c", "path": "p"}}));
        assert_eq!(
            schema.get("addr"),
            Some(&SchemaEntry::Nested(
                Schema::new().with("city", "a.b.c").with("path", "p")
            ))
        );
    }

    #[test]
    fn test_malformed_filter_configs() {
        assert_eq!(FilterConfig::from(json!(null)), FilterConfig::Unsupported(json!(null)));
        assert_eq!(FilterConfig::from(json!([])), FilterConfig::Unsupported(json!([])));
        assert_eq!(FilterConfig::from(json!([1, 2])), FilterConfig::Unsupported(json!([1, 2])));
        assert_eq!(
            FilterConfig::from(json!({"name": "x", "other": 1})),
            FilterConfig::Unsupported(json!({"name": "x", "other": 1}))
        );
    }

    #[test]
    fn test_invalid_schemas() {
        assert!(Schema::try_from(json!("a.b")).is_err());
        assert!(Schema::try_from(json!({"a": {"path": "x", "schema": "y"}})).is_err());
        assert!(Schema::try_from(json!({"a": {"path": "x", "filters": "upper"}})).is_err());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let schema = Schema::new().with("a", "1").with("b", "2").with("a", "3");
        let entries: Vec<(&str, &SchemaEntry)> = schema.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a", &SchemaEntry::from("3")));
    }

    #[test]
    fn test_to_value_reparses() {
        let source = json!({
            "a": "x",
            "b": null,
            "c": {"path": "y", "filters": ["upper", ["replace", "a", "b"]]},
            "d": {"nested": "z"},
            "e": []
        });
        let schema = parse(source);
        assert_eq!(parse(schema.to_value()), schema);
    }

    #[test]
    fn test_deserialize_from_yaml_like_json() {
        let schema: Schema = serde_json::from_str(r#"{"id": "user.id"}"#).unwrap();
        assert_eq!(schema.len(), 1);
        assert!(serde_json::from_str::<Schema>("[1, 2]").is_err());
    }
}
