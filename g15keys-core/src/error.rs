//! Error types for the g15keys engine

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{InputToken, Key, PressState};

/// Problems found while building a configuration snapshot.
///
/// These are fatal at startup and make a reload fail as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration defines no modes")]
    NoModes,

    #[error("mode '{0}' is defined more than once")]
    DuplicateMode(String),

    #[error("binding refers to undefined mode '{0}'")]
    UnknownMode(String),

    #[error("{mode}.{key}.{state}: switch target '{target}' is not a known mode")]
    UnknownSwitchTarget {
        mode: String,
        key: Key,
        state: PressState,
        target: String,
    },

    #[error("{mode}.{key}.{state}: program path is empty")]
    EmptyProgramPath {
        mode: String,
        key: Key,
        state: PressState,
    },

    #[error("{mode}.{key}.{state}: program path '{}' is not absolute", path.display())]
    RelativeProgramPath {
        mode: String,
        key: Key,
        state: PressState,
        path: PathBuf,
    },
}

#[derive(Error, Debug)]
#[error("failed to emit {token}: {source}")]
pub struct EmitError {
    pub token: InputToken,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Debug)]
#[error("failed to launch '{}': {source}", program.display())]
pub struct LaunchError {
    pub program: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Failure reported by an LED controller or a macro sink
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct SinkError {
    pub context: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SinkError {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }
}
