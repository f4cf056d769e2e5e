//! Language packages linked into this crate
//!
//! [`BuiltinModules`] is the resolver behind [`crate::LanguageRegistry::builtin`]:
//! - `tree-sitter-<grammar>` modules export grammar factories
//! - `legacy-modes/mode/<file>` modules export syntect-backed stream parsers
//!
//! Languages in the table whose package is not linked in (SQL, Markdown,
//! YAML, most legacy modes) are still recognized by name and filename; loading
//! them reports `ModuleNotFound` or `ExportNotFound`.

mod grammars;
mod legacy;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::module::{LanguageModule, ModuleResolver};

pub use self::legacy::SyntectStreamParser;

/// Resolver over the packages compiled into this crate
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinModules;

impl BuiltinModules {
    pub fn new() -> Self {
        Self
    }

    /// Whether `module` names a package this resolver can import
    pub fn provides(&self, module: &str) -> bool {
        grammars::package(module).is_some()
            || module
                .strip_prefix(crate::description::LEGACY_MODE_PREFIX)
                .is_some_and(|file| legacy::mode_files().any(|known| known == file))
    }
}

#[async_trait]
impl ModuleResolver for BuiltinModules {
    async fn import(&self, module: &str) -> Result<Arc<dyn LanguageModule>, LoadError> {
        if let Some(package) = grammars::package(module) {
            return Ok(package);
        }
        if let Some(package) = legacy::package(module).await? {
            return Ok(package);
        }
        tracing::debug!("No built-in package for module {}", module);
        Err(LoadError::ModuleNotFound {
            module: module.to_string(),
        })
    }
}
