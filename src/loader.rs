//! Deferred loaders
//!
//! A [`Loader`] describes how to produce a descriptor's language support
//! without doing it. Most loaders are data: a module to import and an export
//! to use from it. The export is either called as a factory or, for legacy
//! modes, wrapped with the stream adapter. Anything else can be expressed as
//! a custom loader.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LoadError;
use crate::module::{Export, FactoryOptions, ModuleResolver};
use crate::support::LanguageSupport;

/// Future returned by loader invocations
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<LanguageSupport, LoadError>> + Send>>;

/// Caller-supplied deferred operation
pub type CustomLoader = Arc<dyn Fn(Arc<dyn ModuleResolver>) -> LoadFuture + Send + Sync>;

#[derive(Clone)]
pub enum Loader {
    /// Import `module` and call `export` as a factory with `options`
    Factory {
        module: String,
        export: String,
        options: FactoryOptions,
    },
    /// Import `module`, take `export` as a stream parser and wrap it
    Legacy { module: String, export: String },
    Custom(CustomLoader),
}

impl Loader {
    pub fn factory(module: impl Into<String>, export: impl Into<String>) -> Self {
        Loader::Factory {
            module: module.into(),
            export: export.into(),
            options: FactoryOptions::new(),
        }
    }

    pub fn legacy(module: impl Into<String>, export: impl Into<String>) -> Self {
        Loader::Legacy {
            module: module.into(),
            export: export.into(),
        }
    }

    pub fn custom<F, Fut>(load: F) -> Self
    where
        F: Fn(Arc<dyn ModuleResolver>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<LanguageSupport, LoadError>> + Send + 'static,
    {
        Loader::Custom(Arc::new(move |resolver| Box::pin(load(resolver))))
    }

    /// Set a factory option. Has no effect on other loader kinds.
    pub fn option(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if let Loader::Factory { options, .. } = &mut self {
            options.insert(key.to_string(), value.into());
        }
        self
    }

    /// Replace all factory options. Has no effect on other loader kinds.
    pub fn options(mut self, new_options: FactoryOptions) -> Self {
        if let Loader::Factory { options, .. } = &mut self {
            *options = new_options;
        }
        self
    }

    /// Module this loader imports, if it is known without running it
    pub fn module(&self) -> Option<&str> {
        match self {
            Loader::Factory { module, .. } | Loader::Legacy { module, .. } => Some(module),
            Loader::Custom(_) => None,
        }
    }

    /// Export this loader uses, if it is known without running it
    pub fn export(&self) -> Option<&str> {
        match self {
            Loader::Factory { export, .. } | Loader::Legacy { export, .. } => Some(export),
            Loader::Custom(_) => None,
        }
    }

    /// Start the load. Nothing happens until the returned future is polled.
    pub fn invoke(&self, resolver: Arc<dyn ModuleResolver>) -> LoadFuture {
        match self {
            Loader::Factory {
                module,
                export,
                options,
            } => {
                let module = module.clone();
                let export = export.clone();
                let options = options.clone();
                Box::pin(async move {
                    match import_export(resolver.as_ref(), &module, &export).await? {
                        // Query compilation is CPU-bound; keep it off the async workers
                        Export::Factory(factory) => {
                            tokio::task::spawn_blocking(move || factory(&options))
                                .await
                                .map_err(|e| LoadError::factory(export, e))?
                        }
                        Export::StreamParser(_) => Err(LoadError::ExportKind {
                            module,
                            export,
                            expected: "factory",
                        }),
                    }
                })
            }
            Loader::Legacy { module, export } => {
                let module = module.clone();
                let export = export.clone();
                Box::pin(async move {
                    match import_export(resolver.as_ref(), &module, &export).await? {
                        Export::StreamParser(parser) => Ok(LanguageSupport::legacy(parser)),
                        Export::Factory(_) => Err(LoadError::ExportKind {
                            module,
                            export,
                            expected: "stream parser",
                        }),
                    }
                })
            }
            Loader::Custom(load) => load(resolver),
        }
    }
}

async fn import_export(
    resolver: &dyn ModuleResolver,
    module: &str,
    export: &str,
) -> Result<Export, LoadError> {
    let imported = resolver.import(module).await?;
    imported.export(export).ok_or_else(|| LoadError::ExportNotFound {
        module: module.to_string(),
        export: export.to_string(),
    })
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loader::Factory {
                module,
                export,
                options,
            } => f
                .debug_struct("Factory")
                .field("module", module)
                .field("export", export)
                .field("options", options)
                .finish(),
            Loader::Legacy { module, export } => f
                .debug_struct("Legacy")
                .field("module", module)
                .field("export", export)
                .finish(),
            Loader::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleTable, StaticModule};
    use crate::support::{StreamParser, StreamState, StreamToken};

    struct Words;

    impl StreamParser for Words {
        fn name(&self) -> &str {
            "words"
        }

        fn start_state(&self) -> StreamState {
            Box::new(())
        }

        fn token_line(&self, _line: &str, _state: &mut StreamState) -> Vec<StreamToken> {
            Vec::new()
        }
    }

    fn resolver() -> Arc<dyn ModuleResolver> {
        Arc::new(
            ModuleTable::new().with(
                StaticModule::new("pkg")
                    .with_factory("named", |options: &FactoryOptions| {
                        let name = options
                            .get("name")
                            .and_then(|v| v.as_str())
                            .unwrap_or("default");
                        Ok(LanguageSupport::legacy(Arc::new(Named(name.to_string()))))
                    })
                    .with_stream_parser("words", Arc::new(Words)),
            ),
        )
    }

    struct Named(String);

    impl StreamParser for Named {
        fn name(&self) -> &str {
            &self.0
        }

        fn start_state(&self) -> StreamState {
            Box::new(())
        }

        fn token_line(&self, _line: &str, _state: &mut StreamState) -> Vec<StreamToken> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_factory_receives_options() {
        let plain = Loader::factory("pkg", "named").invoke(resolver()).await.unwrap();
        assert_eq!(plain.name(), "default");

        let dialect = Loader::factory("pkg", "named")
            .option("name", "PostgreSQL")
            .invoke(resolver())
            .await
            .unwrap();
        assert_eq!(dialect.name(), "PostgreSQL");
    }

    #[tokio::test]
    async fn test_factory_runs_off_the_runtime_thread() {
        let caller = std::thread::current().id();
        let resolver: Arc<dyn ModuleResolver> = Arc::new(
            ModuleTable::new().with(
                StaticModule::new("pkg")
                    .with_factory("elsewhere", move |_: &FactoryOptions| {
                        assert_ne!(std::thread::current().id(), caller);
                        Ok(LanguageSupport::legacy(Arc::new(Words)))
                    })
                    .with_factory("broken", |_: &FactoryOptions| panic!("bad query")),
            ),
        );

        let support = Loader::factory("pkg", "elsewhere")
            .invoke(Arc::clone(&resolver))
            .await
            .unwrap();
        assert_eq!(support.name(), "words");

        let err = Loader::factory("pkg", "broken").invoke(resolver).await.unwrap_err();
        assert!(matches!(err, LoadError::Factory { language, .. } if language == "broken"));
    }

    #[tokio::test]
    async fn test_legacy_wraps_stream_parser() {
        let support = Loader::legacy("pkg", "words").invoke(resolver()).await.unwrap();
        assert!(support.is_stream());
        assert_eq!(support.name(), "words");
    }

    #[tokio::test]
    async fn test_export_shape_mismatch() {
        let err = Loader::factory("pkg", "words").invoke(resolver()).await.unwrap_err();
        assert!(matches!(err, LoadError::ExportKind { expected: "factory", .. }));

        let err = Loader::legacy("pkg", "named").invoke(resolver()).await.unwrap_err();
        assert!(matches!(err, LoadError::ExportKind { expected: "stream parser", .. }));
    }

    #[tokio::test]
    async fn test_missing_module_and_export() {
        let err = Loader::factory("nope", "x").invoke(resolver()).await.unwrap_err();
        assert!(matches!(err, LoadError::ModuleNotFound { .. }));

        let err = Loader::legacy("pkg", "Words").invoke(resolver()).await.unwrap_err();
        assert_eq!(
            err,
            LoadError::ExportNotFound {
                module: "pkg".to_string(),
                export: "Words".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_custom_loader_uses_resolver() {
        let loader = Loader::custom(|resolver: Arc<dyn ModuleResolver>| async move {
            Loader::legacy("pkg", "words").invoke(resolver).await
        });
        assert_eq!(loader.module(), None);
        let support = loader.invoke(resolver()).await.unwrap();
        assert_eq!(support.name(), "words");
    }

    #[test]
    fn test_option_ignored_for_legacy() {
        let loader = Loader::legacy("m", "e").option("jsx", true);
        assert_eq!(loader.module(), Some("m"));
        assert_eq!(loader.export(), Some("e"));
        assert!(matches!(loader, Loader::Legacy { .. }));
    }
}
