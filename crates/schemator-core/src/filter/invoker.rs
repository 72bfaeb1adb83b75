//! Filter chain invocation
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use super::FilterContext;
use crate::engine::Schemator;
use crate::error::{Error, Result};
use crate::schema::FilterConfig;
use serde_json::Value;

/// Thread `value` through `chain` left to right.
///
/// The output of each step is the input of the next. The first failing step
/// ends the chain.
pub fn apply_chain(
    engine: &Schemator,
    value: Value,
    chain: &[FilterConfig],
    source: &Value,
) -> Result<Value> {
    chain
        .iter()
        .try_fold(value, |current, config| apply_one(engine, current, config, source))
}

/// Apply a single filter config.
pub fn apply_one(
    engine: &Schemator,
    value: Value,
    config: &FilterConfig,
    source: &Value,
) -> Result<Value> {
    let (name, args) = match config {
        FilterConfig::Call { name, args } => (name.as_str(), args.as_slice()),
        FilterConfig::Unsupported(raw) => return Err(Error::unsupported_filter_config_type(raw)),
    };

    let filter = engine.filters().get(name)?;
    let ctx = FilterContext {
        name,
        args,
        source,
        engine,
    };

    log::trace!("Applying filter '{}' with {} argument(s)", name, args.len());

    match filter.apply(&value, &ctx) {
        Ok(output) => Ok(output),
        Err(err) => Err(match err.downcast::<Error>() {
            Ok(engine_error) => engine_error,
            Err(cause) => Error::filter_error(name, args, value, cause),
        }),
    }
}
