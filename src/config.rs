//! User configuration of the language table
//!
//! Users can add languages or override built-in ones from a JSON file:
//!
//! ```json
//! {
//!   "languages": [
//!     { "name": "Starlark", "extensions": ["star", "bzl"], "module": "tree-sitter-python", "load_name": "python" },
//!     { "name": "Shell", "legacy": true, "filename": "^(PKGBUILD|APKBUILD)$", "extensions": ["sh", "bash"] }
//!   ]
//! }
//! ```
//!
//! Entries use the same conventions as the built-in table, so a legacy entry
//! without `load_name` loads `legacy-modes/mode/<name>`.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::description::{LanguageDescription, LanguageSpec};
use crate::error::ConfigError;
use crate::loader::Loader;
use crate::module::FactoryOptions;

/// Contents of `languages.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LanguagesConfig {
    /// Languages to add, or to replace when the name matches a built-in one
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

/// One language in the user configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LanguageEntry {
    /// Display name; replaces the built-in language with exactly this name
    pub name: String,

    /// Alternative names, matched case-insensitively
    #[serde(default)]
    pub aliases: Vec<String>,

    /// File extensions without the leading dot, matched case-sensitively
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regular expression tested against file names, before extensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Module supplying the implementation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Export to load from the module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_name: Option<String>,

    /// Use a legacy stream mode instead of a grammar
    #[serde(default)]
    pub legacy: bool,

    /// Options passed to the factory (ignored for legacy modes).
    /// For example `{"dialect": "PostgreSQL"}` for SQL.
    #[serde(default, skip_serializing_if = "FactoryOptions::is_empty")]
    pub options: FactoryOptions,
}

impl LanguageEntry {
    fn to_spec(&self) -> LanguageSpec {
        let mut spec = LanguageSpec::new(&self.name)
            .aliases(self.aliases.iter().cloned())
            .extensions(self.extensions.iter().cloned());
        if let Some(pattern) = &self.filename {
            spec = spec.filename(pattern);
        }
        if let Some(module) = &self.module {
            spec = spec.module(module);
        }
        if let Some(load_name) = &self.load_name {
            spec = spec.load_name(load_name);
        }
        spec
    }

    pub fn to_description(&self) -> Result<LanguageDescription, ConfigError> {
        let spec = self.to_spec();
        if self.legacy {
            return LanguageDescription::of_legacy(spec);
        }
        if self.options.is_empty() {
            return LanguageDescription::of(spec);
        }
        let loader = Loader::factory(spec.default_module(), spec.default_export())
            .options(self.options.clone());
        LanguageDescription::of(spec.loader(loader))
    }
}

impl LanguagesConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `languages.json` in the user's fresh config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fresh").join("languages.json"))
    }

    /// Load the user's configuration, or an empty one if there is none
    pub fn load_user() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading language config from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}
