//! Custom error types for the bot shell.
//!
//! Only startup failures (configuration, store connection, command
//! registration) are allowed to stop the process. Everything raised while
//! handling an event is caught at the handler boundary and reported.

use std::fmt;

/// Main error type for shell operations.
#[derive(Debug)]
pub enum ShellError {
    /// Missing or malformed configuration and credentials
    Config(String),
    /// Persistence backend unreachable or not yet connected
    Connection(String),
    /// Query failures against a connected store
    Database(String),
    /// Outbound HTTP failures (stats heartbeat)
    Network(String),
    /// Feature module registration failures
    Registration(String),
    /// Chat framework and gateway errors
    Discord(String),
    /// Generic I/O errors
    Io(std::io::Error),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Registration(msg) => write!(f, "Registration error: {}", msg),
            Self::Discord(msg) => write!(f, "Discord error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl ShellError {
    /// Whether this error may terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Connection(_) | Self::Registration(_)
        )
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for ShellError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<reqwest::Error> for ShellError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON parsing error: {}", err))
    }
}

impl From<std::env::VarError> for ShellError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ShellError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Database(format!("Task join error: {}", err))
    }
}

impl From<poise::serenity_prelude::Error> for ShellError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        Self::Discord(err.to_string())
    }
}

/// Result type alias for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
