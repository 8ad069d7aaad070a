//! Errors surfaced by the bootstrap

use thiserror::Error;

/// Failure of a bootstrap step.
///
/// Server-side conditions are passed through as the server reported them;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("User \"{user}@{db}\" already exists")]
    UserAlreadyExists { user: String, db: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Command failed ({code_name}, code {code}): {message}")]
    CommandFailed {
        code: i32,
        code_name: String,
        message: String,
    },

    #[error("Invalid credential record: {0}")]
    InvalidRecord(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Shell error: {0}")]
    Shell(String),
}

impl BootstrapError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserAlreadyExists { .. } => "user_already_exists",
            Self::Connection(_) => "connection",
            Self::Authorization(_) => "authorization",
            Self::CommandFailed { .. } => "command_failed",
            Self::InvalidRecord(_) => "invalid_record",
            Self::VerificationFailed(_) => "verification_failed",
            Self::Shell(_) => "shell",
        }
    }
}
