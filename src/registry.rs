//! The language registry: ordered descriptions plus lookup and loading
//!
//! Lookups scan the descriptions in authoring order and return the first
//! match, so when two languages claim the same extension (`h` for C and C++,
//! `m` for Mathematica, Objective-C and Octave) the earlier one wins. That
//! order is part of the data; callers that care about the alternatives can
//! use [`LanguageRegistry::find_all_by_filename`].

use std::path::Path;
use std::sync::Arc;

use crate::builtin::BuiltinModules;
use crate::config::LanguagesConfig;
use crate::data;
use crate::description::LanguageDescription;
use crate::error::{ConfigError, LoadError};
use crate::module::ModuleResolver;
use crate::support::LanguageSupport;

/// Registry of known languages.
///
/// Built once and read-only afterwards; the only state that changes is each
/// description's cached support.
pub struct LanguageRegistry {
    languages: Vec<LanguageDescription>,
    resolver: Arc<dyn ModuleResolver>,
}

impl LanguageRegistry {
    /// Create a registry from descriptions in authoring order
    pub fn new(
        languages: Vec<LanguageDescription>,
        resolver: Arc<dyn ModuleResolver>,
    ) -> Result<Self, ConfigError> {
        check_unique_names(&languages)?;
        tracing::debug!("Language registry built with {} languages", languages.len());
        Ok(Self {
            languages,
            resolver,
        })
    }

    /// Registry over the built-in language table and packages
    pub fn try_builtin() -> Result<Self, ConfigError> {
        Self::new(data::languages()?, Arc::new(BuiltinModules::new()))
    }

    /// Registry over the built-in language table and packages.
    ///
    /// # Panics
    /// If the built-in table is malformed, which is a defect in this crate.
    pub fn builtin() -> Self {
        Self::try_builtin().unwrap_or_else(|e| panic!("built-in language table is invalid: {e}"))
    }

    /// Apply user configuration.
    ///
    /// An entry named like an existing language replaces it in place; other
    /// entries go before all existing languages so they win shared
    /// extensions.
    pub fn with_config(self, config: &LanguagesConfig) -> Result<Self, ConfigError> {
        let Self {
            mut languages,
            resolver,
        } = self;

        let mut added = Vec::new();
        for entry in &config.languages {
            let description = entry.to_description()?;
            match languages
                .iter()
                .position(|existing| existing.name() == description.name())
            {
                Some(index) => {
                    tracing::debug!("Config overrides language {}", description.name());
                    languages[index] = description;
                }
                None => {
                    tracing::debug!("Config adds language {}", description.name());
                    added.push(description);
                }
            }
        }

        added.extend(languages);
        Self::new(added, resolver)
    }

    /// All languages in authoring order
    pub fn all(&self) -> &[LanguageDescription] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn resolver(&self) -> &Arc<dyn ModuleResolver> {
        &self.resolver
    }

    /// Find a language by name or alias, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&LanguageDescription> {
        let name = name.to_lowercase();
        self.languages.iter().find(|lang| lang.matches_name(&name))
    }

    /// Find a language by name or alias, optionally also accepting names
    /// that merely contain one.
    ///
    /// With `fuzzy`, `"rust-lang"` finds Rust and `"objective-c source"`
    /// finds Objective-C. Names of two characters or fewer only count when
    /// surrounded by non-word characters, so `"markdown"` does not match D.
    pub fn match_language_name(&self, name: &str, fuzzy: bool) -> Option<&LanguageDescription> {
        if let Some(exact) = self.find_by_name(name) {
            return Some(exact);
        }
        if !fuzzy {
            return None;
        }

        let name = name.to_lowercase();
        self.languages.iter().find(|lang| {
            lang.match_names()
                .any(|candidate| contains_delimited(&name, candidate))
        })
    }

    /// Find the language for a file.
    ///
    /// Filename patterns are tried first, against the file-name portion of
    /// `path`; then the extension (text after the last `.`) is matched
    /// case-sensitively.
    pub fn find_by_filename(&self, path: impl AsRef<Path>) -> Option<&LanguageDescription> {
        let file_name = path.as_ref().file_name()?.to_str()?;

        if let Some(lang) = self
            .languages
            .iter()
            .find(|lang| lang.matches_filename(file_name))
        {
            return Some(lang);
        }

        let extension = extension_of(file_name)?;
        self.languages
            .iter()
            .find(|lang| lang.has_extension(extension))
    }

    /// Every language that could apply to a file: pattern matches first,
    /// then extension matches, each in authoring order
    pub fn find_all_by_filename(&self, path: impl AsRef<Path>) -> Vec<&LanguageDescription> {
        let Some(file_name) = path.as_ref().file_name().and_then(|name| name.to_str()) else {
            return Vec::new();
        };

        let mut found: Vec<&LanguageDescription> = self
            .languages
            .iter()
            .filter(|lang| lang.matches_filename(file_name))
            .collect();

        if let Some(extension) = extension_of(file_name) {
            for lang in self.languages.iter().filter(|lang| lang.has_extension(extension)) {
                if !found.iter().any(|seen| std::ptr::eq(*seen, lang)) {
                    found.push(lang);
                }
            }
        }

        found
    }

    /// Load a language's support through this registry's resolver
    ///
    /// # Panics
    /// If the language is not loaded yet and this is polled outside a Tokio
    /// runtime.
    pub async fn load(
        &self,
        language: &LanguageDescription,
    ) -> Result<Arc<LanguageSupport>, LoadError> {
        language.load(Arc::clone(&self.resolver)).await
    }

    /// Look up by name and load in one step; `Ok(None)` when the name is
    /// unknown
    pub async fn load_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<LanguageSupport>>, LoadError> {
        match self.find_by_name(name) {
            Some(language) => self.load(language).await.map(Some),
            None => Ok(None),
        }
    }
}

fn check_unique_names(languages: &[LanguageDescription]) -> Result<(), ConfigError> {
    for (index, lang) in languages.iter().enumerate() {
        if languages[..index]
            .iter()
            .any(|earlier| earlier.name() == lang.name())
        {
            return Err(ConfigError::DuplicateName(lang.name().to_string()));
        }
    }
    Ok(())
}

/// Text after the last `.`, if non-empty
fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `needle` occurs in `haystack` (first occurrence), and if it is
/// short, is delimited by non-word characters or the string edges
fn contains_delimited(haystack: &str, needle: &str) -> bool {
    let Some(start) = haystack.find(needle) else {
        return false;
    };
    if needle.chars().count() > 2 {
        return true;
    }
    let before = haystack[..start].chars().next_back();
    let after = haystack[start + needle.len()..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
