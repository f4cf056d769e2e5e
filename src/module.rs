//! Module resolution: where deferred loaders get their implementations
//!
//! A loader names a module and an export inside it. The [`ModuleResolver`]
//! turns the module name into a [`LanguageModule`], and the module hands out
//! its named [`Export`]s. Exports come in the two shapes the loaders know:
//! factories for grammar-backed languages, and stream parsers for legacy
//! modes.
//!
//! Resolution is a table lookup, not dynamic loading: every module is linked
//! in and registered up front ([`ModuleTable`], or the built-in packages in
//! [`crate::builtin`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::support::{LanguageSupport, StreamParser};

/// Options passed to a factory export, e.g. `{"jsx": true}` or
/// `{"dialect": "PostgreSQL"}`
pub type FactoryOptions = serde_json::Map<String, serde_json::Value>;

/// Zero-configuration constructor for a language, taking optional options
pub type Factory =
    Arc<dyn Fn(&FactoryOptions) -> Result<LanguageSupport, LoadError> + Send + Sync>;

/// A named entry of a language module
#[derive(Clone)]
pub enum Export {
    /// Builds the language support directly
    Factory(Factory),
    /// A line tokenizer that needs the legacy adapter
    StreamParser(Arc<dyn StreamParser>),
}

impl Export {
    pub fn kind(&self) -> &'static str {
        match self {
            Export::Factory(_) => "factory",
            Export::StreamParser(_) => "stream parser",
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Factory(_) => f.write_str("Export::Factory(..)"),
            Export::StreamParser(parser) => write!(f, "Export::StreamParser({})", parser.name()),
        }
    }
}

/// An imported package supplying one or more languages
pub trait LanguageModule: Send + Sync {
    /// Identifier the module was imported under
    fn id(&self) -> &str;

    /// Look up an export by name (case-sensitive)
    fn export(&self, name: &str) -> Option<Export>;
}

/// Imports language modules by identifier.
///
/// Import is asynchronous because a module may need real work before its
/// exports are usable (the syntect packages load their syntax set on first
/// import).
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    async fn import(&self, module: &str) -> Result<Arc<dyn LanguageModule>, LoadError>;
}

/// A module with a fixed set of exports
pub struct StaticModule {
    id: String,
    exports: HashMap<String, Export>,
}

impl StaticModule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exports: HashMap::new(),
        }
    }

    pub fn with_export(mut self, name: impl Into<String>, export: Export) -> Self {
        self.exports.insert(name.into(), export);
        self
    }

    pub fn with_factory<F>(self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&FactoryOptions) -> Result<LanguageSupport, LoadError> + Send + Sync + 'static,
    {
        self.with_export(name, Export::Factory(Arc::new(factory)))
    }

    pub fn with_stream_parser(self, name: impl Into<String>, parser: Arc<dyn StreamParser>) -> Self {
        self.with_export(name, Export::StreamParser(parser))
    }

    /// Names of all exports, sorted
    pub fn export_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl LanguageModule for StaticModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn export(&self, name: &str) -> Option<Export> {
        self.exports.get(name).cloned()
    }
}

/// Resolver over modules registered ahead of time
#[derive(Default)]
pub struct ModuleTable {
    modules: HashMap<String, Arc<dyn LanguageModule>>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under its own id, replacing any previous one
    pub fn register(&mut self, module: impl LanguageModule + 'static) -> &mut Self {
        self.modules
            .insert(module.id().to_string(), Arc::new(module));
        self
    }

    pub fn with(mut self, module: impl LanguageModule + 'static) -> Self {
        self.register(module);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn LanguageModule>> {
        self.modules.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }
}

#[async_trait]
impl ModuleResolver for ModuleTable {
    async fn import(&self, module: &str) -> Result<Arc<dyn LanguageModule>, LoadError> {
        self.get(module).ok_or_else(|| LoadError::ModuleNotFound {
            module: module.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{Language, StreamLanguage, StreamState, StreamToken};

    struct Plain;

    impl StreamParser for Plain {
        fn name(&self) -> &str {
            "plain"
        }

        fn start_state(&self) -> StreamState {
            Box::new(())
        }

        fn token_line(&self, _line: &str, _state: &mut StreamState) -> Vec<StreamToken> {
            Vec::new()
        }
    }

    fn plain_support(_: &FactoryOptions) -> Result<LanguageSupport, LoadError> {
        Ok(LanguageSupport::new(Language::Stream(StreamLanguage::define(
            Arc::new(Plain),
        ))))
    }

    #[test]
    fn test_static_module_exports() {
        let module = StaticModule::new("pkg")
            .with_factory("make", plain_support)
            .with_stream_parser("plain", Arc::new(Plain));

        assert_eq!(module.id(), "pkg");
        assert_eq!(module.export_names(), vec!["make", "plain"]);
        assert_eq!(module.export("make").unwrap().kind(), "factory");
        assert_eq!(module.export("plain").unwrap().kind(), "stream parser");
        assert!(module.export("Make").is_none());
    }

    #[tokio::test]
    async fn test_module_table_import() {
        let table = ModuleTable::new().with(StaticModule::new("pkg").with_factory("make", plain_support));

        assert!(table.contains("pkg"));
        let module = table.import("pkg").await.unwrap();
        assert_eq!(module.id(), "pkg");

        let err = table.import("missing").await.err().unwrap();
        assert_eq!(
            err,
            LoadError::ModuleNotFound {
                module: "missing".to_string()
            }
        );
    }
}
