//! Error types for the sample shell.

use thiserror::Error;

/// Errors raised while running a shell command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid or missing command-line input
    #[error("{0}")]
    Command(String),

    /// Error returned by the Sample client
    #[error(transparent)]
    Client(#[from] sample_core::Error),

    /// Failed to write command output
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Shorthand for [`CliError::Command`].
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}

/// Result alias for shell commands.
pub type CliResult<T> = Result<T, CliError>;
