//! # Error Types
//!
//! Errors raised by the foundational layer. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Representation errors are usage errors: they mean a value of a kind
//!   the checker cannot describe reached the engine. They are never folded
//!   into a diagnostic tree.
//! - Load errors carry the underlying parser error so callers can report
//!   the position of a malformed document.

use thiserror::Error;

/// Error raised by the Representation Service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReprError {
    /// The value is of a runtime kind that has no representation label.
    #[error("cannot represent a value of unsupported kind '{kind}'")]
    UnsupportedKind {
        /// Host-provided name of the value's kind.
        kind: String,
    },
}

/// Error converting an external document into a [`Value`](crate::Value).
#[derive(Error, Debug)]
pub enum ValueLoadError {
    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A YAML mapping used a key that has no string form.
    #[error("unsupported map key: {0}")]
    UnsupportedKey(String),

    /// A YAML number could not be represented as a finite double.
    #[error("unrepresentable number: {0}")]
    UnrepresentableNumber(String),
}

/// Error reading validation options from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An option variable held something other than a boolean flag.
    #[error("invalid value '{value}' for {var}: expected one of 1/0, true/false, yes/no, on/off")]
    InvalidFlag {
        /// Environment variable name.
        var: String,
        /// The rejected value.
        value: String,
    },
}
