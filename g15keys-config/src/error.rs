use std::io;
use std::path::PathBuf;

use g15keys_core::{ConfigError, Key, PressState};
use thiserror::Error;

/// A malformed action descriptor string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("empty action")]
    Empty,

    #[error("unexpected '{text}' at column {column}")]
    UnexpectedText { column: usize, text: String },

    #[error("expected {expected} at column {column}")]
    Expected { column: usize, expected: &'static str },

    #[error("'{keyword}' needs {what}")]
    MissingOperand {
        keyword: &'static str,
        what: &'static str,
    },

    #[error("{kind} code {code} out of range {min}..={max}")]
    CodeOutOfRange {
        kind: &'static str,
        code: u32,
        min: u32,
        max: u32,
    },

    #[error("bad quoting: {0}")]
    Quoting(String),
}

/// Errors produced while loading or rewriting the configuration file
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{location}: {message}")]
    Document { location: String, message: String },

    #[error("profile '{mode}': unknown key '{key}'")]
    UnknownKey { mode: String, key: String },

    #[error("profile '{mode}', {key} {state}: {source}")]
    Descriptor {
        mode: String,
        key: Key,
        state: PressState,
        #[source]
        source: DescriptorError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConfigFileError {
    pub(crate) fn document(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigFileError::Document {
            location: location.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigFileError>;
