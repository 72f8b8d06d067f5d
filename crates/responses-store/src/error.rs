//! Response storage errors.

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// (guild, name) is already taken. Nothing was written.
    #[error("Response '{name}' already exists in guild {guild_id}")]
    DuplicateName { guild_id: String, name: String },

    /// No record with this (guild, name).
    #[error("Response '{name}' not found in guild {guild_id}")]
    NotFound { guild_id: String, name: String },

    /// A stored trigger is not a valid regular expression.
    #[error("Invalid trigger pattern for '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: fancy_regex::Error,
    },

    /// A trigger compiled but gave up while matching, usually by hitting
    /// the backtracking limit.
    #[error("Matching trigger '{name}' failed: {source}")]
    MatchAborted {
        name: String,
        #[source]
        source: fancy_regex::Error,
    },

    /// The backend could not be reached or opened.
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by [`crate::ResponsesManager`].
///
/// The two logic errors carry exactly one short message each; everything
/// else is a backend failure passed through untouched.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("A response with that name already exists.")]
    AlreadyExists { name: String },

    #[error("No such response.")]
    NoSuchResponse { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError {
    /// True for the two user-correctable errors.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ResponseError::AlreadyExists { .. } | ResponseError::NoSuchResponse { .. }
        )
    }
}
