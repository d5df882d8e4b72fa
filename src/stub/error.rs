//! Error types for stub parsing and rendering.

use std::fmt;
use std::path::PathBuf;

/// Which registry a missing capability was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Filter,
    Helper,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Filter => f.write_str("filter"),
            CapabilityKind::Helper => f.write_str("helper"),
        }
    }
}

/// Errors that can occur while loading, rendering or decoding a stub.
///
/// Malformed tags are not errors: the lexer leaves them in place as text.
#[derive(thiserror::Error, Debug)]
pub enum StubError {
    #[error("{kind} '{name}' is not defined")]
    UndefinedCapability { kind: CapabilityKind, name: String },

    #[error("failed to decode front matter as TOML ({toml}) or YAML ({yaml})")]
    MalformedFrontMatter { toml: String, yaml: String },

    #[error("invalid front matter: {0}")]
    InvalidFrontMatter(String),

    #[error("invalid arguments for '{name}': {message}")]
    InvalidArguments { name: String, message: String },

    #[error("failed to read stub '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stub '{path}' exceeds the maximum `put` nesting depth")]
    RecursionLimit { path: PathBuf },
}

impl StubError {
    pub fn undefined_filter(name: impl Into<String>) -> Self {
        Self::UndefinedCapability {
            kind: CapabilityKind::Filter,
            name: name.into(),
        }
    }

    pub fn undefined_helper(name: impl Into<String>) -> Self {
        Self::UndefinedCapability {
            kind: CapabilityKind::Helper,
            name: name.into(),
        }
    }

    /// Create an argument error for the named filter or helper.
    pub fn invalid_arguments(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            name: name.into(),
            message: message.into(),
        }
    }
}
