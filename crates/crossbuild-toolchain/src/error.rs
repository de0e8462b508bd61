//! Error types for toolchain descriptor operations.

use std::path::PathBuf;

/// Errors that can occur while reading, parsing, or writing descriptors.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing descriptor files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor file not found.
    #[error("toolchain descriptor not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A line of a CMake descriptor could not be understood.
    #[error("line {line}: {detail}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A `set(...)` declaration names a variable the descriptor does not model.
    #[error("line {line}: unknown variable `{key}`")]
    UnknownKey { line: usize, key: String },

    /// The same variable is set twice.
    #[error("line {line}: `{key}` is already set")]
    DuplicateKey { line: usize, key: String },

    /// A required variable never appears.
    #[error("missing required variable `{0}`")]
    MissingKey(&'static str),

    /// A variable has a value outside its domain.
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },

    /// A root-path search mode is not `NEVER`, `ONLY`, or `BOTH`.
    #[error("invalid root-path mode `{0}`: expected NEVER, ONLY, or BOTH")]
    InvalidMode(String),

    /// A target triple string is malformed.
    #[error("invalid target triple `{0}`: expected arch-vendor-os[-env]")]
    Triple(String),
}

/// Result type for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
