//! User configuration applied on top of the built-in table

use fresh_languages::{ConfigError, LanguageRegistry, LanguagesConfig};
use serde_json::json;

fn write_config(dir: &tempfile::TempDir, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("languages.json");
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

#[test]
fn test_new_languages_win_shared_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        json!({
            "languages": [{
                "name": "Starlark",
                "aliases": ["star"],
                "extensions": ["star", "bzl"],
                "module": "tree-sitter-python",
                "load_name": "python"
            }]
        }),
    );

    let config = LanguagesConfig::from_file(&path).unwrap();
    let registry = LanguageRegistry::builtin().with_config(&config).unwrap();

    assert_eq!(registry.len(), 144);
    assert_eq!(registry.all()[0].name(), "Starlark");
    assert_eq!(registry.find_by_filename("defs.bzl").unwrap().name(), "Starlark");
    assert_eq!(registry.find_by_filename("main.py").unwrap().name(), "Python");
    assert_eq!(registry.find_by_name("STAR").unwrap().name(), "Starlark");
}

#[test]
fn test_same_name_replaces_in_place() {
    let builtin = LanguageRegistry::builtin();
    let position = builtin
        .all()
        .iter()
        .position(|lang| lang.name() == "Shell")
        .unwrap();

    let config: LanguagesConfig = serde_json::from_value(json!({
        "languages": [{
            "name": "Shell",
            "legacy": true,
            "aliases": ["bash", "sh"],
            "extensions": ["sh", "bash"],
            "filename": "^(PKGBUILD|APKBUILD)$"
        }]
    }))
    .unwrap();
    let registry = builtin.with_config(&config).unwrap();

    assert_eq!(registry.len(), 143);
    assert_eq!(registry.all()[position].name(), "Shell");
    assert_eq!(registry.find_by_filename("APKBUILD").unwrap().name(), "Shell");
    assert!(registry.find_by_filename("x.ksh").is_none());
    assert!(registry.find_by_name("zsh").is_none());
}

#[test]
fn test_config_errors_surface() {
    let duplicate: LanguagesConfig = serde_json::from_value(json!({
        "languages": [{ "name": "Zig" }, { "name": "Zig" }]
    }))
    .unwrap();
    assert!(matches!(
        LanguageRegistry::builtin().with_config(&duplicate),
        Err(ConfigError::DuplicateName(name)) if name == "Zig"
    ));

    let dotted: LanguagesConfig = serde_json::from_value(json!({
        "languages": [{ "name": "Zig", "extensions": [".zig"] }]
    }))
    .unwrap();
    assert!(matches!(
        LanguageRegistry::builtin().with_config(&dotted),
        Err(ConfigError::InvalidExtension { .. })
    ));

    let bad_pattern: LanguagesConfig = serde_json::from_value(json!({
        "languages": [{ "name": "Zig", "filename": "[" }]
    }))
    .unwrap();
    assert!(matches!(
        LanguageRegistry::builtin().with_config(&bad_pattern),
        Err(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn test_schema_describes_entries() {
    let schema = serde_json::to_value(schemars::schema_for!(LanguagesConfig)).unwrap();
    let text = schema.to_string();

    assert!(schema["properties"]["languages"].is_object());
    assert!(text.contains("load_name"));
    assert!(text.contains("filename"));
}
