use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::allowlist::AllowlistError;
use crate::config::settings::ConfigError;
use crate::hook::input::InputError;

/// Top-level error that wraps all module-specific errors
///
/// None of these ever escape the hook as a crash. The runner records them in
/// the audit log and falls back to an allow verdict or to built-in defaults.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Allowlist error: {0}")]
    Allowlist(#[from] AllowlistError),

    #[error("Hook input error: {0}")]
    Input(#[from] InputError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
