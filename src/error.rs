//! Batch error types.
//!
//! Only unrecoverable conditions are errors: unreadable or malformed input,
//! invalid configuration, and failed output writes. Unroutable orders and
//! coherence findings are ordinary values.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input file a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Flights,
    Orders,
    Airports,
    Cancellations,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Flights => "flights",
            InputKind::Orders => "orders",
            InputKind::Airports => "airports",
            InputKind::Cancellations => "cancellations",
        };
        f.write_str(name)
    }
}

/// Fatal batch errors.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record does not follow its file grammar.
    #[error("{kind} line {line}: {reason}")]
    Malformed {
        kind: InputKind,
        /// 1-based line number.
        line: usize,
        reason: String,
    },

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The TOML configuration file does not parse.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An output payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn malformed(kind: InputKind, line: usize, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            kind,
            line,
            reason: reason.into(),
        }
    }
}
