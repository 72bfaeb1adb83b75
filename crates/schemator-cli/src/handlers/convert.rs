//! Convert command handler

use super::utils::{read_document, read_stdin_document, write_document};
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemator_core::error::type_name;
use schemator_core::{ErrorsLevelMask, MassSchemator, Schema, Schemator};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, instrument};

/// Handle the convert command
#[instrument(skip(args, config, output), fields(schema = %args.schema.display()))]
pub fn handle_convert(args: ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let input_name = args
        .input
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    let timer = Timer::with_details(
        "convert_command",
        &format!("schema: {}, input: {}", args.schema.display(), input_name),
    );

    let schema = load_schema(&args.schema)?;
    let input = match &args.input {
        Some(path) => read_document(path)?,
        None => read_stdin_document()?,
    };

    let schemator = build_engine(&args, config)?;
    debug!(
        keys = schema.len(),
        delimiter = schemator.path_delimiter(),
        mask = %schemator.errors_level_mask(),
        "Engine ready"
    );

    let converted = if args.batch {
        convert_batch(schemator, &input, &schema, output)?
    } else {
        let converted = schemator.convert(&input, &schema)?;
        report_omitted(&schema, &converted, output)?;
        converted
    };

    match &args.save_to {
        Some(path) => {
            write_document(path, &converted)?;
            output.success(&format!("✓ Wrote {} to {}", describe(&converted, args.batch), path.display()))?;
        }
        None => output.converted(&converted, args.batch)?,
    }

    info!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        batch = args.batch,
        "Conversion finished"
    );
    Ok(())
}

/// Parse a schema file
fn load_schema(path: &Path) -> Result<Schema> {
    let value = read_document(path)?;
    Ok(Schema::try_from(value)?)
}

/// Build the engine from the configuration and the command-line overrides
fn build_engine(args: &ConvertArgs, config: &Config) -> Result<Schemator> {
    let mut builder = config.engine.builder()?;

    if let Some(delimiter) = &args.delimiter {
        builder = builder.with_path_delimiter(delimiter.clone());
    }

    if args.tolerate_all {
        builder = builder.with_errors_level_mask(ErrorsLevelMask::all());
    } else {
        for kind in &args.tolerate {
            builder = builder.tolerate(*kind);
        }
    }

    Ok(builder.build()?)
}

/// Convert every item of a list, stopping at the first failure
fn convert_batch(
    schemator: Schemator,
    input: &Value,
    schema: &Schema,
    output: &mut OutputWriter,
) -> Result<Value> {
    let items = input.as_array().ok_or_else(|| {
        Error::invalid_args(format!(
            "--batch expects a list of documents, got {}",
            type_name(input)
        ))
    })?;

    output.info(&format!("Converting {} item(s)", items.len()))?;
    let progress = output.progress_bar(items.len() as u64, "Converting");

    let mass = MassSchemator::new(schemator);
    let mut converted = Vec::with_capacity(items.len());
    for (index, result) in mass.generate(items, schema).enumerate() {
        match result {
            Ok(value) => converted.push(value),
            Err(e) => {
                error!(item = index, "Batch conversion failed: {}", e);
                if let Some(pb) = &progress {
                    pb.abandon_with_message(format!("failed at item {}", index));
                }
                return Err(e.into());
            }
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let omitted: usize = converted.iter().map(|item| omitted_keys(schema, item)).sum();
    if omitted > 0 {
        output.warning(&format!("{} key(s) omitted across the batch by tolerated errors", omitted))?;
    }

    Ok(Value::Array(converted))
}

fn report_omitted(schema: &Schema, converted: &Value, output: &mut OutputWriter) -> Result<()> {
    let omitted = omitted_keys(schema, converted);
    if omitted > 0 {
        output.warning(&format!("{} key(s) omitted by tolerated errors", omitted))?;
    }
    Ok(())
}

/// Number of schema keys missing from a converted document
fn omitted_keys(schema: &Schema, converted: &Value) -> usize {
    match converted {
        Value::Object(map) => schema.keys().filter(|key| !map.contains_key(*key)).count(),
        _ => 0,
    }
}

fn describe(converted: &Value, batch: bool) -> String {
    match (batch, converted) {
        (true, Value::Array(items)) => format!("{} documents", items.len()),
        _ => "1 document".to_string(),
    }
}
