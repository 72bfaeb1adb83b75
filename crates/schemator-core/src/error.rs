//! Error types for the Schemator core library
//!
//! Every failure the engine can raise is a variant of [`Error`]. The six
//! conversion categories map onto [`ErrorKind`], which is what the
//! [`ErrorsLevelMask`](crate::ErrorsLevelMask) inspects when deciding whether
//! a failed key is omitted or the whole conversion aborts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Main error type for Schemator operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema referenced a filter name that is not registered
    #[error("filter '{filter}' not found")]
    FilterNotFound { filter: String },

    /// A filter failed while transforming a value
    #[error("filter error: '{filter}': {source}")]
    FilterError {
        filter: String,
        args: Vec<Value>,
        value: Value,
        #[source]
        source: anyhow::Error,
    },

    /// A key, index or property was absent at some path segment
    #[error("cannot get value by key '{key}'")]
    CannotGetValue { key: String, data: Value },

    /// A path step landed on a value that is not a container
    #[error("unsupported source type '{source_type}' for key '{key}'")]
    UnsupportedSourceType {
        key: String,
        data: Value,
        source_type: &'static str,
    },

    /// A path or segment cannot address the current container
    #[error("unsupported key type '{key_type}' for key {key}")]
    UnsupportedKeyType {
        key: Value,
        data: Value,
        key_type: &'static str,
    },

    /// A filter config is neither a name, a `[name, args...]` list nor a `{name, args}` object
    #[error("unsupported filter config type '{config_type}'")]
    UnsupportedFilterConfigType {
        config: Value,
        config_type: &'static str,
    },

    /// Invalid engine or schema configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories raised during conversion
///
/// The discriminants are the stable numeric codes of each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Unregistered filter name, never tolerated
    FilterNotFound = 1,
    /// Failure inside a filter body, never tolerated
    FilterError = 2,
    /// Absent key, index or property
    CannotGetValue = 3,
    /// Non-container value at a path step
    UnsupportedSourceType = 4,
    /// Path segment invalid for the container
    UnsupportedKeyType = 5,
    /// Malformed filter config
    UnsupportedFilterConfigType = 6,
}

impl ErrorKind {
    /// All categories in code order
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::FilterNotFound,
        ErrorKind::FilterError,
        ErrorKind::CannotGetValue,
        ErrorKind::UnsupportedSourceType,
        ErrorKind::UnsupportedKeyType,
        ErrorKind::UnsupportedFilterConfigType,
    ];

    /// Categories that an errors level mask may suppress
    pub const TOLERABLE: [ErrorKind; 4] = [
        ErrorKind::CannotGetValue,
        ErrorKind::UnsupportedSourceType,
        ErrorKind::UnsupportedKeyType,
        ErrorKind::UnsupportedFilterConfigType,
    ];

    /// Numeric code of the category
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether a mask can ever suppress this category
    pub fn is_tolerable(self) -> bool {
        !matches!(self, ErrorKind::FilterNotFound | ErrorKind::FilterError)
    }

    /// Kebab-case name used in configuration files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::FilterNotFound => "filter-not-found",
            ErrorKind::FilterError => "filter-error",
            ErrorKind::CannotGetValue => "cannot-get-value",
            ErrorKind::UnsupportedSourceType => "unsupported-source-type",
            ErrorKind::UnsupportedKeyType => "unsupported-key-type",
            ErrorKind::UnsupportedFilterConfigType => "unsupported-filter-config-type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::configuration(format!("unknown error category '{}'", s)))
    }
}

impl Error {
    /// Create a "cannot get value" error for `key` inside `data`
    pub fn cannot_get_value(data: &Value, key: impl Into<String>) -> Self {
        Self::CannotGetValue {
            key: key.into(),
            data: data.clone(),
        }
    }

    /// Create an "unsupported source type" error for a non-container `data`
    pub fn unsupported_source_type(data: &Value, key: impl Into<String>) -> Self {
        Self::UnsupportedSourceType {
            key: key.into(),
            data: data.clone(),
            source_type: type_name(data),
        }
    }

    /// Create an "unsupported key type" error
    pub fn unsupported_key_type(data: &Value, key: Value) -> Self {
        let key_type = match &key {
            Value::String(s) if s.is_empty() => "empty string",
            other => type_name(other),
        };
        Self::UnsupportedKeyType {
            key,
            data: data.clone(),
            key_type,
        }
    }

    /// Create an "unsupported filter config type" error
    pub fn unsupported_filter_config_type(config: &Value) -> Self {
        Self::UnsupportedFilterConfigType {
            config: config.clone(),
            config_type: type_name(config),
        }
    }

    /// Wrap a failure raised inside a filter body
    pub fn filter_error(
        filter: impl Into<String>,
        args: &[Value],
        value: Value,
        source: anyhow::Error,
    ) -> Self {
        Self::FilterError {
            filter: filter.into(),
            args: args.to_vec(),
            value,
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Category of this error, `None` for configuration and serialization failures
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::FilterNotFound { .. } => Some(ErrorKind::FilterNotFound),
            Error::FilterError { .. } => Some(ErrorKind::FilterError),
            Error::CannotGetValue { .. } => Some(ErrorKind::CannotGetValue),
            Error::UnsupportedSourceType { .. } => Some(ErrorKind::UnsupportedSourceType),
            Error::UnsupportedKeyType { .. } => Some(ErrorKind::UnsupportedKeyType),
            Error::UnsupportedFilterConfigType { .. } => {
                Some(ErrorKind::UnsupportedFilterConfigType)
            }
            Error::Configuration { .. } | Error::Json { .. } => None,
        }
    }
}

/// Short type name of a JSON value for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
