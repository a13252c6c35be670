//! Error types for Patchwork.

use std::io;

/// Errors produced by the Patchwork libraries.
#[derive(Debug, thiserror::Error)]
pub enum PatchworkError {
    /// A source image does not follow the nine-patch marker convention.
    #[error("invalid nine-patch format: {0}")]
    InvalidFormat(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PatchworkError>;
