//! Error types for Laere.

use thiserror::Error;

/// Library-level error type for Laere operations.
#[derive(Error, Debug)]
pub enum LaereError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for Laere operations.
pub type Result<T> = std::result::Result<T, LaereError>;
