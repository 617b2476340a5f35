use signup_sheet_db::OperationError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Store operation failed
    #[error("{0}")]
    Store(#[from] OperationError),

    /// A command that needs a location was run without one
    #[error("No location selected. Pass --location or run 'signup-sheet select <LOCATION>'.")]
    NoLocation,

    /// Bad command-line input that clap cannot catch
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<signup_sheet_db::SchemaError> for CliError {
    fn from(err: signup_sheet_db::SchemaError) -> Self {
        Self::Store(err.into())
    }
}
