//! Error types for the dispatch layer.
//!
//! All errors implement the standard Error trait and carry enough context
//! for a handler or an embedding application to decide whether a failure is
//! fatal for its specific command.

use thiserror::Error;


/// Main error type for dispatch-layer operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Credential-configuration errors (missing HOME, unreadable file,
    /// malformed JSON, undecodable auth entry)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stream I/O errors raised by the dispatch layer itself
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failures reported by a command handler; opaque to the dispatcher
    /// and propagated unchanged as the dispatch outcome
    #[error("{message}")]
    Command {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for dispatch-layer operations.
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::error::CliError;
    ///
    /// let err = CliError::config("credential file is malformed", None);
    /// assert!(matches!(err, CliError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::error::CliError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    /// let err = CliError::config_with_source(
    ///     "failed to read credential file".to_string(),
    ///     Some("/home/user/.stevedorecfg".to_string()),
    ///     io_err,
    /// );
    /// assert!(matches!(err, CliError::Config { .. }));
    /// ```
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new command error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stevedore::error::CliError;
    ///
    /// let err = CliError::command("no such container: web");
    /// assert!(matches!(err, CliError::Command { .. }));
    /// ```
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new command error with a source error.
    pub fn command_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Command {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
