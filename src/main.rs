//! Command-line inspector for the language registry
//!
//! Usage:
//!   fresh-languages list [--legacy | --modern]
//!   fresh-languages detect src/main.rs Dockerfile
//!   fresh-languages name "objective-c source" --fuzzy
//!   fresh-languages load Rust
//!   fresh-languages schema > languages.schema.json
//!
//! Set `RUST_LOG=fresh_languages=debug` to see registry and loader logs.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fresh_languages::{Language, LanguageDescription, LanguageRegistry, LanguagesConfig};
use schemars::schema_for;

#[derive(Parser, Debug)]
#[command(name = "fresh-languages")]
#[command(about = "Inspect the languages known to Fresh")]
#[command(version)]
struct Cli {
    /// Languages config to apply (defaults to the user's languages.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore user configuration and use only the built-in table
    #[arg(long, global = true)]
    no_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known languages in lookup order
    List {
        /// Only legacy stream modes
        #[arg(long, conflicts_with = "modern")]
        legacy: bool,
        /// Only grammar-backed languages
        #[arg(long)]
        modern: bool,
    },
    /// Detect the language of one or more files
    Detect {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Show every candidate, not just the one that wins
        #[arg(long)]
        all: bool,
    },
    /// Look up a language by name or alias
    Name {
        name: String,
        /// Also accept names that merely contain a known name
        #[arg(long)]
        fuzzy: bool,
    },
    /// Load a language's support and report what was loaded
    Load { name: String },
    /// Print the JSON Schema of the languages config file
    Schema,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::List { legacy, modern } => {
            let registry = build_registry(&cli)?;
            for lang in registry
                .all()
                .iter()
                .filter(|lang| !(*legacy && !lang.is_legacy()) && !(*modern && lang.is_legacy()))
            {
                println!("{}", describe(lang));
            }
        }
        Command::Detect { paths, all } => {
            let registry = build_registry(&cli)?;
            for path in paths {
                if *all {
                    let names: Vec<&str> = registry
                        .find_all_by_filename(path)
                        .iter()
                        .map(|lang| lang.name())
                        .collect();
                    println!("{}: {}", path.display(), names.join(", "));
                } else {
                    let name = registry
                        .find_by_filename(path)
                        .map_or("(unknown)", |lang| lang.name());
                    println!("{}: {}", path.display(), name);
                }
            }
        }
        Command::Name { name, fuzzy } => {
            let registry = build_registry(&cli)?;
            match registry.match_language_name(name, *fuzzy) {
                Some(lang) => println!("{}", describe(lang)),
                None => bail!("no language named {name:?}"),
            }
        }
        Command::Load { name } => {
            let registry = build_registry(&cli)?;
            let Some(lang) = registry.find_by_name(name) else {
                bail!("no language named {name:?}");
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .context("failed to start runtime")?;
            let support = runtime
                .block_on(registry.load(lang))
                .with_context(|| format!("failed to load {}", lang.name()))?;
            let kind = match support.language() {
                Language::TreeSitter(_) => "tree-sitter grammar",
                Language::Stream(_) => "stream language",
            };
            println!("{}: loaded {} ({})", lang.name(), support.name(), kind);
        }
        Command::Schema => {
            let schema = schema_for!(LanguagesConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn build_registry(cli: &Cli) -> Result<LanguageRegistry> {
    let registry = LanguageRegistry::try_builtin().context("built-in language table")?;
    if cli.no_config {
        return Ok(registry);
    }

    let config = match &cli.config {
        Some(path) => LanguagesConfig::from_file(path)?,
        None => LanguagesConfig::load_user()?,
    };
    if config.languages.is_empty() {
        return Ok(registry);
    }
    Ok(registry.with_config(&config)?)
}

fn describe(lang: &LanguageDescription) -> String {
    let mut line = format!(
        "{} [{}] {}",
        lang.name(),
        if lang.is_legacy() { "legacy" } else { "modern" },
        lang.module()
    );
    if !lang.aliases().is_empty() {
        line.push_str(&format!(" aliases: {}", lang.aliases().join(", ")));
    }
    if !lang.extensions().is_empty() {
        line.push_str(&format!(" extensions: {}", lang.extensions().join(", ")));
    }
    if let Some(pattern) = lang.filename() {
        line.push_str(&format!(" filename: /{}/", pattern.as_str()));
    }
    line
}
