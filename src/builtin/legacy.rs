//! Legacy stream modes backed by syntect
//!
//! Each `legacy-modes/mode/<file>` module exports stream parsers named the
//! way the mode file names them (`clike` exports `csharp`, `scala`, ...),
//! each driving one of syntect's default syntaxes a line at a time.
//!
//! The default syntax set is large, so it is loaded on first import on the
//! blocking pool and shared by every parser afterwards.

use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use crate::description::LEGACY_MODE_PREFIX;
use crate::error::LoadError;
use crate::module::{LanguageModule, StaticModule};
use crate::support::{StreamParser, StreamState, StreamToken, TokenStyle};

/// Mode file, then (export, syntect syntax name) pairs
const LEGACY_MODES: &[(&str, &[(&str, &str)])] = &[
    (
        "clike",
        &[
            ("csharp", "C#"),
            ("scala", "Scala"),
            ("objectiveC", "Objective-C"),
            ("objectiveCpp", "Objective-C++"),
        ],
    ),
    ("clojure", &[("clojure", "Clojure")]),
    ("commonlisp", &[("commonLisp", "Lisp")]),
    ("css", &[("gss", "CSS")]),
    ("d", &[("d", "D")]),
    ("diff", &[("diff", "Diff")]),
    ("erlang", &[("erlang", "Erlang")]),
    ("groovy", &[("groovy", "Groovy")]),
    ("haskell", &[("haskell", "Haskell")]),
    ("javascript", &[("jsonld", "JSON")]),
    ("lua", &[("lua", "Lua")]),
    ("mllike", &[("oCaml", "OCaml")]),
    ("octave", &[("octave", "MATLAB")]),
    ("pascal", &[("pascal", "Pascal")]),
    ("perl", &[("perl", "Perl")]),
    ("properties", &[("properties", "Java Properties")]),
    ("r", &[("r", "R")]),
    ("ruby", &[("ruby", "Ruby")]),
    ("shell", &[("shell", "Bourne Again Shell (bash)")]),
    ("stex", &[("stex", "LaTeX")]),
    ("tcl", &[("tcl", "Tcl")]),
    ("textile", &[("textile", "Textile")]),
];

static SYNTAX_SET: Lazy<Arc<SyntaxSet>> = Lazy::new(|| {
    tracing::debug!("Loading default syntect syntaxes");
    Arc::new(SyntaxSet::load_defaults_newlines())
});

/// Mode files available under the legacy prefix
pub(super) fn mode_files() -> impl Iterator<Item = &'static str> {
    LEGACY_MODES.iter().map(|(file, _)| *file)
}

/// Import the legacy mode module `module`, or `None` if there is no such
/// mode file
pub(super) async fn package(module: &str) -> Result<Option<Arc<dyn LanguageModule>>, LoadError> {
    let Some(file) = module.strip_prefix(LEGACY_MODE_PREFIX) else {
        return Ok(None);
    };
    let Some((_, exports)) = LEGACY_MODES.iter().find(|(name, _)| *name == file) else {
        return Ok(None);
    };

    let syntax_set = tokio::task::spawn_blocking(|| Arc::clone(&SYNTAX_SET))
        .await
        .map_err(|e| LoadError::factory("syntect", e))?;

    let mut package = StaticModule::new(module);
    for (export, syntax_name) in exports.iter() {
        match SyntectStreamParser::new(Arc::clone(&syntax_set), syntax_name) {
            Some(parser) => package = package.with_stream_parser(*export, Arc::new(parser)),
            None => tracing::debug!(
                "Syntax {} not in default set, {}/{} unavailable",
                syntax_name,
                module,
                export
            ),
        }
    }
    Ok(Some(Arc::new(package)))
}

/// Map TextMate scope to token style
fn scope_to_style(scope: &str) -> Option<TokenStyle> {
    let scope = scope.to_lowercase();

    if scope.starts_with("comment") {
        return Some(TokenStyle::Comment);
    }

    if scope.starts_with("string") {
        return Some(TokenStyle::String);
    }

    if scope.starts_with("keyword.operator") || scope.starts_with("punctuation") {
        return Some(TokenStyle::Operator);
    }
    if scope.starts_with("keyword") || scope.starts_with("storage.modifier") {
        return Some(TokenStyle::Keyword);
    }

    if scope.starts_with("entity.name.function")
        || scope.starts_with("support.function")
        || scope.starts_with("meta.function-call")
        || scope.starts_with("variable.function")
    {
        return Some(TokenStyle::Function);
    }

    if scope.starts_with("entity.name.type")
        || scope.starts_with("entity.name.class")
        || scope.starts_with("support.type")
        || scope.starts_with("support.class")
        || scope.starts_with("storage.type")
    {
        return Some(TokenStyle::Type);
    }

    if scope.starts_with("constant.numeric") || scope.starts_with("constant.language.boolean") {
        return Some(TokenStyle::Number);
    }
    if scope.starts_with("constant") {
        return Some(TokenStyle::Constant);
    }

    if scope.starts_with("variable") {
        return Some(TokenStyle::Variable);
    }

    if scope.starts_with("entity.name.tag")
        || scope.starts_with("support.other.property")
        || scope.starts_with("meta.object-literal.key")
    {
        return Some(TokenStyle::Property);
    }

    if scope.starts_with("entity.other.attribute") || scope.starts_with("meta.attribute") {
        return Some(TokenStyle::Attribute);
    }

    None
}

/// Innermost scope that maps to a style
fn scope_stack_to_style(scopes: &ScopeStack) -> Option<TokenStyle> {
    scopes
        .as_slice()
        .iter()
        .rev()
        .find_map(|scope| scope_to_style(&scope.build_string()))
}

/// Parser state carried between lines
struct LineState {
    parse: ParseState,
    scopes: ScopeStack,
}

/// A syntect syntax driven as a line tokenizer
pub struct SyntectStreamParser {
    syntax_set: Arc<SyntaxSet>,
    syntax_index: usize,
    name: String,
}

impl SyntectStreamParser {
    /// Parser for the syntax called `syntax_name`, if the set has one
    pub fn new(syntax_set: Arc<SyntaxSet>, syntax_name: &str) -> Option<Self> {
        let syntax_index = syntax_set
            .syntaxes()
            .iter()
            .position(|s| s.name == syntax_name)?;

        Some(Self {
            syntax_set,
            syntax_index,
            name: syntax_name.to_string(),
        })
    }

    fn syntax(&self) -> &SyntaxReference {
        &self.syntax_set.syntaxes()[self.syntax_index]
    }

    fn push_token(tokens: &mut Vec<StreamToken>, range: Range<usize>, scopes: &ScopeStack) {
        if range.is_empty() {
            return;
        }
        let Some(style) = scope_stack_to_style(scopes) else {
            return;
        };
        // Merge with the previous token when contiguous and same style
        if let Some(last) = tokens.last_mut() {
            if last.style == style && last.range.end == range.start {
                last.range.end = range.end;
                return;
            }
        }
        tokens.push(StreamToken { range, style });
    }
}

impl StreamParser for SyntectStreamParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_state(&self) -> StreamState {
        Box::new(LineState {
            parse: ParseState::new(self.syntax()),
            scopes: ScopeStack::new(),
        })
    }

    fn token_line(&self, line: &str, state: &mut StreamState) -> Vec<StreamToken> {
        let Some(state) = state.downcast_mut::<LineState>() else {
            tracing::warn!("{}: state was not created by this parser", self.name);
            return Vec::new();
        };

        // The newlines syntax set expects each line to end in '\n'
        let line_with_newline = format!("{}\n", line);
        let line_len = line.len();

        let ops = match state.parse.parse_line(&line_with_newline, &self.syntax_set) {
            Ok(ops) => ops,
            Err(e) => {
                tracing::warn!("{}: failed to parse line: {}", self.name, e);
                return Vec::new();
            }
        };

        let mut tokens = Vec::new();
        let mut offset = 0;
        for (op_offset, op) in ops {
            let clamped = op_offset.min(line_len);
            if clamped > offset {
                Self::push_token(&mut tokens, offset..clamped, &state.scopes);
            }
            offset = clamped;
            let _ = state.scopes.apply(&op);
        }
        if offset < line_len {
            Self::push_token(&mut tokens, offset..line_len, &state.scopes);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::StreamLanguage;

    fn parser(syntax_name: &str) -> SyntectStreamParser {
        SyntectStreamParser::new(Arc::clone(&SYNTAX_SET), syntax_name).unwrap()
    }

    #[test]
    fn test_scope_to_style() {
        assert_eq!(scope_to_style("comment.line.number-sign.ruby"), Some(TokenStyle::Comment));
        assert_eq!(scope_to_style("keyword.control.ruby"), Some(TokenStyle::Keyword));
        assert_eq!(scope_to_style("keyword.operator.assignment"), Some(TokenStyle::Operator));
        assert_eq!(scope_to_style("constant.numeric.integer"), Some(TokenStyle::Number));
        assert_eq!(scope_to_style("source.ruby"), None);
    }

    #[test]
    fn test_ruby_comment_and_string() {
        let ruby = StreamLanguage::define(Arc::new(parser("Ruby")));
        let text = "# greet\nputs \"hi\"\n";
        let tokens = ruby.tokenize(text);

        assert!(tokens
            .iter()
            .any(|t| t.style == TokenStyle::Comment && text[t.range.clone()].contains("greet")));
        assert!(tokens
            .iter()
            .any(|t| t.style == TokenStyle::String && text[t.range.clone()].contains("hi")));
    }

    #[test]
    fn test_state_spans_lines() {
        let ruby = StreamLanguage::define(Arc::new(parser("Ruby")));
        let text = "=begin\nstill a comment\n=end\n";
        let tokens = ruby.tokenize(text);

        let second_line = text.find("still").unwrap();
        assert!(tokens
            .iter()
            .any(|t| t.style == TokenStyle::Comment && t.range.contains(&second_line)));
    }

    #[test]
    fn test_unknown_syntax() {
        assert!(SyntectStreamParser::new(Arc::clone(&SYNTAX_SET), "Dart").is_none());
    }

    #[tokio::test]
    async fn test_package_exports() {
        let clike = package("legacy-modes/mode/clike").await.unwrap().unwrap();
        assert_eq!(clike.id(), "legacy-modes/mode/clike");
        assert!(clike.export("csharp").is_some());
        assert!(clike.export("dart").is_none());

        assert!(package("legacy-modes/mode/cobol").await.unwrap().is_none());
        assert!(package("tree-sitter-ruby").await.unwrap().is_none());
    }
}
