//! Error types
//!
//! Configuration problems are reported up front by `SettingsError`. A
//! `SimError` escaping a tick means the registry and movesets disagree, which
//! is a programming error: callers stop the simulation rather than retry.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal simulation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// A character is casting a move the registry does not know
    #[error("{poke} is using move {name:?}, which is not in the move registry")]
    UnknownMove { poke: String, name: String },
}

/// Roster sampling errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("cannot choose {requested} characters from a pool of {available}")]
    NotEnoughCharacters { requested: usize, available: usize },
}

/// Settings loading and validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error(transparent)]
    Roster(#[from] RosterError),
}
