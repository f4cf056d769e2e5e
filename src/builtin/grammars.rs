//! Tree-sitter grammar packages
//!
//! Each package exports one factory that compiles the grammar's highlight
//! query into a `HighlightConfiguration`. The JavaScript package also serves
//! JSX, TypeScript and TSX through its `jsx` and `typescript` options.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tree_sitter_highlight::HighlightConfiguration;

use crate::error::LoadError;
use crate::module::{FactoryOptions, LanguageModule, ModuleTable, StaticModule};
use crate::support::{GrammarLanguage, Language, LanguageSupport, HIGHLIGHT_NAMES};

static PACKAGES: Lazy<ModuleTable> = Lazy::new(|| {
    ModuleTable::new()
        .with(StaticModule::new("tree-sitter-cpp").with_factory("cpp", |_: &FactoryOptions| {
            grammar(
                "C++",
                tree_sitter_cpp::LANGUAGE.into(),
                "cpp",
                tree_sitter_cpp::HIGHLIGHT_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-css").with_factory("css", |_: &FactoryOptions| {
            grammar(
                "CSS",
                tree_sitter_css::LANGUAGE.into(),
                "css",
                tree_sitter_css::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-go").with_factory("go", |_: &FactoryOptions| {
            grammar(
                "Go",
                tree_sitter_go::LANGUAGE.into(),
                "go",
                tree_sitter_go::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-html").with_factory("html", |_: &FactoryOptions| {
            grammar(
                "HTML",
                tree_sitter_html::LANGUAGE.into(),
                "html",
                tree_sitter_html::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-java").with_factory("java", |_: &FactoryOptions| {
            grammar(
                "Java",
                tree_sitter_java::LANGUAGE.into(),
                "java",
                tree_sitter_java::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-javascript").with_factory("javascript", javascript))
        .with(StaticModule::new("tree-sitter-json").with_factory("json", |_: &FactoryOptions| {
            grammar(
                "JSON",
                tree_sitter_json::LANGUAGE.into(),
                "json",
                tree_sitter_json::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-php").with_factory("php", |_: &FactoryOptions| {
            grammar(
                "PHP",
                tree_sitter_php::LANGUAGE_PHP.into(),
                "php",
                tree_sitter_php::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-python").with_factory("python", |_: &FactoryOptions| {
            grammar(
                "Python",
                tree_sitter_python::LANGUAGE.into(),
                "python",
                tree_sitter_python::HIGHLIGHTS_QUERY,
            )
        }))
        .with(StaticModule::new("tree-sitter-rust").with_factory("rust", |_: &FactoryOptions| {
            grammar(
                "Rust",
                tree_sitter_rust::LANGUAGE.into(),
                "rust",
                tree_sitter_rust::HIGHLIGHTS_QUERY,
            )
        }))
});

/// The grammar package registered under `module`, if any
pub(super) fn package(module: &str) -> Option<Arc<dyn LanguageModule>> {
    PACKAGES.get(module)
}

fn grammar(
    display_name: &str,
    language: tree_sitter::Language,
    ts_name: &str,
    highlights_query: &str,
) -> Result<LanguageSupport, LoadError> {
    let mut config = HighlightConfiguration::new(
        language,
        ts_name,
        highlights_query,
        "", // injections query
        "", // locals query
    )
    .map_err(|e| LoadError::factory(display_name, format!("invalid highlight query: {e}")))?;

    config.configure(&HIGHLIGHT_NAMES);

    Ok(LanguageSupport::new(Language::TreeSitter(GrammarLanguage::new(
        display_name,
        config,
    ))))
}

fn flag(options: &FactoryOptions, key: &str) -> bool {
    options
        .get(key)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

fn javascript(options: &FactoryOptions) -> Result<LanguageSupport, LoadError> {
    match (flag(options, "typescript"), flag(options, "jsx")) {
        (false, false) => grammar(
            "JavaScript",
            tree_sitter_javascript::LANGUAGE.into(),
            "javascript",
            tree_sitter_javascript::HIGHLIGHT_QUERY,
        ),
        (false, true) => {
            let query = format!(
                "{}\n{}",
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                tree_sitter_javascript::JSX_HIGHLIGHT_QUERY
            );
            grammar(
                "JSX",
                tree_sitter_javascript::LANGUAGE.into(),
                "javascript",
                &query,
            )
        }
        (true, false) => grammar(
            "TypeScript",
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            "typescript",
            tree_sitter_typescript::HIGHLIGHTS_QUERY,
        ),
        (true, true) => grammar(
            "TSX",
            tree_sitter_typescript::LANGUAGE_TSX.into(),
            "tsx",
            tree_sitter_typescript::HIGHLIGHTS_QUERY,
        ),
    }
}
