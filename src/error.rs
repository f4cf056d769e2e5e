//! Error types for building the registry and loading language support
//!
//! Lookups never fail: a missing language is `None`, and the editor falls
//! back to plain text. Only construction (`ConfigError`) and loading
//! (`LoadError`) have error types.

use std::path::PathBuf;

/// Failure to produce a `LanguageSupport` from a descriptor's loader.
///
/// Cloneable so a single in-flight load can hand the same outcome to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The module resolver does not know the module.
    #[error("language module `{module}` not found")]
    ModuleNotFound { module: String },

    /// The module exists but has no export with that name.
    #[error("module `{module}` has no export `{export}`")]
    ExportNotFound { module: String, export: String },

    /// The export exists but is not the shape the loader expects
    /// (a factory where a stream parser was needed, or vice versa).
    #[error("export `{export}` of module `{module}` is not a {expected}")]
    ExportKind {
        module: String,
        export: String,
        expected: &'static str,
    },

    /// The factory ran but could not build the language.
    #[error("failed to create {language} language support: {message}")]
    Factory { language: String, message: String },

    /// The background load ended without reporting a result.
    #[error("loading {language} was interrupted")]
    Interrupted { language: String },
}

impl LoadError {
    pub fn factory(language: impl Into<String>, message: impl ToString) -> Self {
        Self::Factory {
            language: language.into(),
            message: message.to_string(),
        }
    }
}

/// A malformed language specification or configuration file.
///
/// These indicate defects in static data and are reported when the registry
/// is built, never during lookup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("language specification has an empty name")]
    MissingName,

    #[error("language `{0}` is defined more than once")]
    DuplicateName(String),

    #[error("language `{language}` has invalid extension `{extension}` (must be non-empty without a leading dot)")]
    InvalidExtension { language: String, extension: String },

    #[error("language `{language}` has an empty alias")]
    InvalidAlias { language: String },

    #[error("language `{language}` has an invalid filename pattern")]
    InvalidPattern {
        language: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read languages config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse languages config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
