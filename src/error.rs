//! Application error type.
//!
//! Every fallible operation in the crate returns `AppError`. The error carries the
//! process exit code it should map to, so `main` stays a thin shell:
//!
//! - `2`: invalid input or configuration (flags, files, table shape, writes)
//! - `4`: retrieval or rendering failure (network, HTTP status, charts)

use thiserror::Error;

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_EXTERNAL: u8 = 4;

#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad flags, unreadable files, malformed tables.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    /// Network, HTTP and chart backend failures.
    pub fn external(message: impl Into<String>) -> Self {
        Self::new(EXIT_EXTERNAL, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}
