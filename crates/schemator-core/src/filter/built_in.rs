//! Built-in filters for common operations
//!
//! Register them all with [`register_all`] or
//! [`SchematorBuilder::with_built_in_filters`](crate::SchematorBuilder::with_built_in_filters).
//!
//! | Name | Input | Arguments | Output |
//! |---|---|---|---|
//! | `const` | any | value | the argument |
//! | `default` | any | value | the argument when the input is null |
//! | `upper`, `lower`, `trim` | string | | string |
//! | `sum` | array of numbers | | number |
//! | `average` | non-empty array of numbers | | float |
//! | `count` | array, object or string | | integer |
//! | `implode` | array of scalars | separator (`,`) | string |
//! | `explode` | string | separator (`,`) | array of strings |
//! | `flatten` | array | | array |
//! | `sort`, `rsort` | array of numbers or of strings | | array |
//! | `unique` | array | | array |
//! | `replace` | string | regex, replacement | string |
//! | `date` | unix timestamp | format (`%Y-%m-%d %H:%M:%S`) | string |
//! | `path` | any | path | value at the path |
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use super::{FilterContext, FilterRegistry};
use crate::error::type_name;
use anyhow::{anyhow, bail, Context};
use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Signature shared by every built-in filter
pub type BuiltInFilter = fn(&Value, &FilterContext<'_>) -> anyhow::Result<Value>;

/// Names and functions of all built-in filters
pub const FILTERS: [(&str, BuiltInFilter); 17] = [
    ("const", constant),
    ("default", default_value),
    ("upper", upper),
    ("lower", lower),
    ("trim", trim),
    ("sum", sum),
    ("average", average),
    ("count", count),
    ("implode", implode),
    ("explode", explode),
    ("flatten", flatten),
    ("sort", sort),
    ("rsort", rsort),
    ("unique", unique),
    ("replace", replace),
    ("date", date),
    ("path", path),
];

const DEFAULT_SEPARATOR: &str = ",";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Register every built-in filter, replacing filters of the same names
pub fn register_all(registry: &mut FilterRegistry) {
    for (name, filter) in FILTERS {
        registry.register(name, filter);
    }
}

fn required_arg<'a>(ctx: &FilterContext<'a>, index: usize, what: &str) -> anyhow::Result<&'a Value> {
    ctx.arg(index)
        .ok_or_else(|| anyhow!("'{}' requires {} as argument {}", ctx.name, what, index + 1))
}

fn expect_str<'v>(value: &'v Value, ctx: &FilterContext<'_>) -> anyhow::Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| anyhow!("'{}' expects a string, got {}", ctx.name, type_name(value)))
}

fn expect_array<'v>(value: &'v Value, ctx: &FilterContext<'_>) -> anyhow::Result<&'v Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| anyhow!("'{}' expects an array, got {}", ctx.name, type_name(value)))
}

fn separator<'a>(ctx: &FilterContext<'a>) -> anyhow::Result<&'a str> {
    match ctx.arg(0) {
        None => Ok(DEFAULT_SEPARATOR),
        Some(Value::String(sep)) => Ok(sep.as_str()),
        Some(other) => bail!("'{}' separator must be a string, got {}", ctx.name, type_name(other)),
    }
}

pub fn constant(_value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    required_arg(ctx, 0, "a value").cloned()
}

pub fn default_value(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    if value.is_null() {
        required_arg(ctx, 0, "a default value").cloned()
    } else {
        Ok(value.clone())
    }
}

pub fn upper(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(value, ctx)?.to_uppercase()))
}

pub fn lower(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(value, ctx)?.to_lowercase()))
}

pub fn trim(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(value, ctx)?.trim().to_string()))
}

/// Integers stay integers as long as every item is one and nothing overflows.
pub fn sum(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let items = expect_array(value, ctx)?;
    let numbers = numbers(items, ctx)?;

    let integer_sum = numbers
        .iter()
        .try_fold(0i64, |acc, n| n.as_i64().and_then(|i| acc.checked_add(i)));
    if let Some(total) = integer_sum {
        return Ok(Value::from(total));
    }

    let total: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
    float(total, ctx)
}

pub fn average(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let items = expect_array(value, ctx)?;
    if items.is_empty() {
        bail!("'{}' cannot average an empty array", ctx.name);
    }
    let numbers = numbers(items, ctx)?;
    let total: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
    float(total / numbers.len() as f64, ctx)
}

fn numbers<'v>(items: &'v [Value], ctx: &FilterContext<'_>) -> anyhow::Result<Vec<&'v Number>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Number(n) => Ok(n),
            other => Err(anyhow!(
                "'{}' expects numbers, item {} is {}",
                ctx.name,
                i,
                type_name(other)
            )),
        })
        .collect()
}

fn float(n: f64, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| anyhow!("'{}' produced a non-finite number", ctx.name))
}

pub fn count(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let len = match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        other => bail!("'{}' cannot count a {}", ctx.name, type_name(other)),
    };
    Ok(Value::from(len))
}

pub fn implode(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let items = expect_array(value, ctx)?;
    let sep = separator(ctx)?;
    let parts = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(anyhow!("'{}' cannot join a {}", ctx.name, type_name(other))),
        })
        .collect::<anyhow::Result<Vec<String>>>()?;
    Ok(Value::String(parts.join(sep)))
}

pub fn explode(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let text = expect_str(value, ctx)?;
    let sep = separator(ctx)?;
    if sep.is_empty() {
        bail!("'{}' separator must not be empty", ctx.name);
    }
    Ok(Value::Array(
        text.split(sep).map(|part| Value::String(part.to_string())).collect(),
    ))
}

pub fn flatten(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    fn walk(value: &Value, out: &mut Vec<Value>) {
        match value {
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            other => out.push(other.clone()),
        }
    }

    let mut out = Vec::new();
    for item in expect_array(value, ctx)? {
        walk(item, &mut out);
    }
    Ok(Value::Array(out))
}

pub fn sort(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    sorted(value, ctx, false)
}

pub fn rsort(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    sorted(value, ctx, true)
}

fn sorted(value: &Value, ctx: &FilterContext<'_>, reverse: bool) -> anyhow::Result<Value> {
    let mut items = expect_array(value, ctx)?.clone();

    let all_numbers = items.iter().all(Value::is_number);
    let all_strings = items.iter().all(Value::is_string);
    if !all_numbers && !all_strings {
        bail!("'{}' expects an array of only numbers or only strings", ctx.name);
    }

    items.sort_by(|a, b| {
        let ordering = match (a, b) {
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => {
                let x = a.as_f64().unwrap_or(f64::NAN);
                let y = b.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        };
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    Ok(Value::Array(items))
}

pub fn unique(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let mut out: Vec<Value> = Vec::new();
    for item in expect_array(value, ctx)? {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    Ok(Value::Array(out))
}

pub fn replace(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let text = expect_str(value, ctx)?;
    let pattern = ctx
        .arg_str(0)
        .ok_or_else(|| anyhow!("'{}' requires a regex pattern as argument 1", ctx.name))?;
    let replacement = ctx
        .arg_str(1)
        .ok_or_else(|| anyhow!("'{}' requires a replacement string as argument 2", ctx.name))?;
    let regex = Regex::new(pattern).with_context(|| format!("invalid pattern '{}'", pattern))?;
    Ok(Value::String(regex.replace_all(text, replacement).into_owned()))
}

pub fn date(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let seconds = value
        .as_i64()
        .ok_or_else(|| anyhow!("'{}' expects a unix timestamp, got {}", ctx.name, type_name(value)))?;
    let format = match ctx.arg(0) {
        None => DEFAULT_DATE_FORMAT,
        Some(Value::String(format)) => format.as_str(),
        Some(other) => bail!("'{}' format must be a string, got {}", ctx.name, type_name(other)),
    };
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        bail!("'{}' got an invalid format '{}'", ctx.name, format);
    }
    let datetime = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| anyhow!("timestamp {} is out of range", seconds))?;
    Ok(Value::String(datetime.format_with_items(items.iter()).to_string()))
}

/// Engine errors from resolution pass through untouched, so a missing path
/// here is tolerated exactly like a missing path in the schema.
pub fn path(value: &Value, ctx: &FilterContext<'_>) -> anyhow::Result<Value> {
    let path = ctx
        .arg_str(0)
        .ok_or_else(|| anyhow!("'{}' requires a path as argument 1", ctx.name))?;
    Ok(ctx.get(value, path)?.clone())
}
