//! Error types for the game logic core.
//!
//! The taxonomy is deliberately narrow: a missing path or an empty
//! production result is an expected outcome (`None` / empty lists), not
//! an error. Errors are reserved for misconfiguration detected at
//! construction or data-loading time.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game logic errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A catalog lookup referenced a type that was never registered.
    #[error("Unknown {kind} id: {id}")]
    UnknownType {
        /// Kind of catalog entry (e.g. "building type").
        kind: &'static str,
        /// The id that failed to resolve.
        id: u32,
    },

    /// A required collaborator was absent at construction.
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// Rules data file parsing error.
    #[error("Failed to parse rules data '{path}': {message}")]
    DataParse {
        /// Path or label of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// The game state violates an invariant a computation relies on.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
