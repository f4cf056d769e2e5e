//! Language descriptions and the builder that produces them
//!
//! A [`LanguageSpec`] is the declarative input: a name plus whatever the
//! table author wants to say about aliases, extensions, filename patterns and
//! where the implementation lives. [`of`] and [`of_legacy`] turn a spec into
//! a [`LanguageDescription`], inferring the loader from naming conventions
//! when the spec does not give one:
//!
//! | | module | export |
//! |---|---|---|
//! | `of` | `module`, else `tree-sitter-<name>` | `load_name`, else `<name>` |
//! | `of_legacy` | `legacy-modes/mode/<load_name or name>` | `load_name`, else `<name>` |
//!
//! where `<...>` is lower-cased. Exports named by `load_name` keep their
//! authored case.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{ConfigError, LoadError};
use crate::load_cell::LoadCell;
use crate::loader::Loader;
use crate::module::ModuleResolver;
use crate::support::LanguageSupport;

/// Prefix of the default module for grammar-backed languages
pub const MODULE_PREFIX: &str = "tree-sitter-";

/// Package all legacy modes come from
pub const LEGACY_PACKAGE: &str = "legacy-modes";

/// Prefix of the module a legacy mode is imported from
pub const LEGACY_MODE_PREFIX: &str = "legacy-modes/mode/";

/// Declarative description of one language, before validation
#[derive(Clone, Default)]
pub struct LanguageSpec {
    name: String,
    aliases: Vec<String>,
    extensions: Vec<String>,
    filename: Option<String>,
    module: Option<String>,
    load_name: Option<String>,
    loader: Option<Loader>,
    support: Option<Arc<LanguageSupport>>,
}

impl LanguageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(extensions.into_iter().map(Into::into));
        self
    }

    /// Regular expression tested against the file name (not the full path).
    /// Unanchored unless the pattern anchors itself; use `(?i)` for
    /// case-insensitive matching.
    pub fn filename(mut self, pattern: impl Into<String>) -> Self {
        self.filename = Some(pattern.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn load_name(mut self, load_name: impl Into<String>) -> Self {
        self.load_name = Some(load_name.into());
        self
    }

    pub fn loader(mut self, loader: Loader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Support that is already available; the loader will never run.
    pub fn support(mut self, support: LanguageSupport) -> Self {
        self.support = Some(Arc::new(support));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module the modern convention would import for this spec
    pub(crate) fn default_module(&self) -> String {
        self.module
            .clone()
            .unwrap_or_else(|| format!("{}{}", MODULE_PREFIX, self.name.to_lowercase()))
    }

    /// Export either convention would use for this spec
    pub(crate) fn default_export(&self) -> String {
        self.load_name
            .clone()
            .unwrap_or_else(|| self.name.to_lowercase())
    }

    fn legacy_mode_module(&self) -> String {
        let mode = self.load_name.as_deref().unwrap_or(&self.name);
        format!("{}{}", LEGACY_MODE_PREFIX, mode.to_lowercase())
    }
}

/// Build a description for a grammar-backed language
pub fn of(spec: LanguageSpec) -> Result<LanguageDescription, ConfigError> {
    LanguageDescription::of(spec)
}

/// Build a description for a legacy stream-tokenizer mode
pub fn of_legacy(spec: LanguageSpec) -> Result<LanguageDescription, ConfigError> {
    LanguageDescription::of_legacy(spec)
}

/// One supported language: how to recognize it, and how to load it
pub struct LanguageDescription {
    name: String,
    /// Lower-cased
    aliases: Vec<String>,
    /// Lower-cased `name`, matched alongside the aliases
    lowercase_name: String,
    extensions: Vec<String>,
    filename: Option<Regex>,
    module: String,
    legacy: bool,
    loader: Loader,
    cell: Arc<LoadCell>,
}

impl LanguageDescription {
    pub fn of(mut spec: LanguageSpec) -> Result<Self, ConfigError> {
        let module = spec.default_module();
        let loader = match spec.loader.take() {
            Some(loader) => loader,
            None => Loader::factory(module.clone(), spec.default_export()),
        };
        Self::build(spec, module, false, loader)
    }

    pub fn of_legacy(mut spec: LanguageSpec) -> Result<Self, ConfigError> {
        let loader = match spec.loader.take() {
            Some(loader) => loader,
            None => Loader::legacy(spec.legacy_mode_module(), spec.default_export()),
        };
        Self::build(spec, LEGACY_PACKAGE.to_string(), true, loader)
    }

    fn build(
        spec: LanguageSpec,
        module: String,
        legacy: bool,
        loader: Loader,
    ) -> Result<Self, ConfigError> {
        let LanguageSpec {
            name,
            aliases,
            extensions,
            filename,
            support,
            ..
        } = spec;

        if name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }

        if let Some(extension) = extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError::InvalidExtension {
                language: name,
                extension: extension.clone(),
            });
        }

        if aliases.iter().any(|alias| alias.trim().is_empty()) {
            return Err(ConfigError::InvalidAlias { language: name });
        }

        let filename = match filename {
            Some(pattern) => match Regex::new(&pattern) {
                Ok(regex) => Some(regex),
                Err(source) => {
                    return Err(ConfigError::InvalidPattern {
                        language: name,
                        source,
                    })
                }
            },
            None => None,
        };

        let cell = match support {
            Some(support) => LoadCell::ready(support),
            None => LoadCell::new(),
        };

        Ok(Self {
            lowercase_name: name.to_lowercase(),
            aliases: aliases.iter().map(|alias| alias.to_lowercase()).collect(),
            name,
            extensions,
            filename,
            module,
            legacy,
            loader,
            cell: Arc::new(cell),
        })
    }

    /// Canonical display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names, lower-cased
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn filename(&self) -> Option<&Regex> {
        self.filename.as_ref()
    }

    /// Package supplying the implementation
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Aliases followed by the lower-cased name
    pub(crate) fn match_names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.lowercase_name.as_str()))
    }

    /// Whether `lowercase` (already lower-cased) is this language's name or
    /// one of its aliases
    pub fn matches_name(&self, lowercase: &str) -> bool {
        self.match_names().any(|name| name == lowercase)
    }

    pub fn matches_filename(&self, file_name: &str) -> bool {
        self.filename
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(file_name))
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }

    /// The support object, if it has been loaded
    pub fn support(&self) -> Option<Arc<LanguageSupport>> {
        self.cell.get()
    }

    /// Whether a load is currently in flight
    pub fn is_loading(&self) -> bool {
        self.cell.is_loading()
    }

    /// Load this language's support, at most once at a time.
    ///
    /// Concurrent calls share one load; success is cached, failure is
    /// returned to every waiting caller and the next call tries again.
    ///
    /// # Panics
    /// If a load has to start outside a Tokio runtime; the loader runs on a
    /// spawned task.
    pub async fn load(
        &self,
        resolver: Arc<dyn ModuleResolver>,
    ) -> Result<Arc<LanguageSupport>, LoadError> {
        self.cell
            .get_or_load(&self.name, || self.loader.invoke(resolver))
            .await
    }
}

impl fmt::Debug for LanguageDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageDescription")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("extensions", &self.extensions)
            .field("filename", &self.filename.as_ref().map(Regex::as_str))
            .field("module", &self.module)
            .field("legacy", &self.legacy)
            .field("loader", &self.loader)
            .finish()
    }
}
