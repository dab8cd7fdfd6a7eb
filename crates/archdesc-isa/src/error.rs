//! Error types for recoverable instruction set operations.

use std::path::PathBuf;

/// Errors that can occur while parsing names or resolving supported instruction sets.
///
/// Invalid tags handed to a profile accessor are not represented here: those go
/// through [`crate::fatal::fatal_report`].
#[derive(Debug, thiserror::Error)]
pub enum IsaError {
    /// The property describing the device configuration is missing or empty.
    #[error("unable to get zygote kinds: property '{key}' is unset")]
    PropertyUnset {
        /// The property key that was queried.
        key: String,
    },

    /// The property held a value that names no known configuration.
    #[error("unknown zygote kinds '{value}'")]
    UnknownZygoteKinds {
        /// The raw property value.
        value: String,
    },

    /// The runtime instruction set belongs to no known architecture family.
    #[error("unknown runtime instruction set '{name}'")]
    UnknownRuntimeIsa {
        /// Canonical name of the runtime tag.
        name: &'static str,
    },

    /// A strict parse met a name outside the canonical set.
    #[error("unknown instruction set name '{0}'")]
    UnknownName(String),

    /// A raw discriminant outside the closed set of tags.
    #[error("invalid instruction set discriminant {0}")]
    InvalidDiscriminant(u8),

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a property file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Property file not found.
    #[error("property file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A `build.prop` line without a `=` separator.
    #[error("malformed property line {line}: '{text}'")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
}

/// Result type for instruction set operations.
pub type Result<T> = std::result::Result<T, IsaError>;
