// Language registry for the Fresh editor
//
// Recognizes languages by name, alias or filename and loads their syntax
// support on demand, at most once per language.

pub mod builtin;
pub mod config;
pub mod data;
pub mod description;
pub mod error;
mod load_cell;
pub mod loader;
pub mod module;
pub mod registry;
pub mod support;

pub use builtin::BuiltinModules;
pub use config::{LanguageEntry, LanguagesConfig};
pub use description::{of, of_legacy, LanguageDescription, LanguageSpec};
pub use error::{ConfigError, LoadError};
pub use loader::{LoadFuture, Loader};
pub use module::{
    Export, Factory, FactoryOptions, LanguageModule, ModuleResolver, ModuleTable, StaticModule,
};
pub use registry::LanguageRegistry;
pub use support::{
    GrammarLanguage, Language, LanguageSupport, StreamLanguage, StreamParser, StreamState,
    StreamToken, TokenStyle,
};
