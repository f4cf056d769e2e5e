//! Language support objects handed to the editor
//!
//! A loaded descriptor produces a [`LanguageSupport`]. The editor treats it as
//! an opaque capability; this crate only distinguishes the two shapes a
//! language can come in:
//! - **Tree-sitter grammars** with a compiled highlight configuration
//! - **Stream languages**: line-oriented tokenizers wrapped by the legacy adapter

use std::any::Any;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tree_sitter_highlight::HighlightConfiguration;

/// Capture names every grammar is configured with, in [`TokenStyle`] order.
pub const HIGHLIGHT_NAMES: [&str; 11] = [
    "attribute",
    "comment",
    "constant",
    "function",
    "keyword",
    "number",
    "operator",
    "property",
    "string",
    "type",
    "variable",
];

/// Style category for a highlighted token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStyle {
    Attribute,
    Comment,
    Constant,
    Function,
    Keyword,
    Number,
    Operator,
    Property,
    String,
    Type,
    Variable,
}

impl TokenStyle {
    /// Map a tree-sitter highlight index (into [`HIGHLIGHT_NAMES`]) to a style
    pub fn from_highlight(index: usize) -> Option<Self> {
        Some(match index {
            0 => Self::Attribute,
            1 => Self::Comment,
            2 => Self::Constant,
            3 => Self::Function,
            4 => Self::Keyword,
            5 => Self::Number,
            6 => Self::Operator,
            7 => Self::Property,
            8 => Self::String,
            9 => Self::Type,
            10 => Self::Variable,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute => HIGHLIGHT_NAMES[0],
            Self::Comment => HIGHLIGHT_NAMES[1],
            Self::Constant => HIGHLIGHT_NAMES[2],
            Self::Function => HIGHLIGHT_NAMES[3],
            Self::Keyword => HIGHLIGHT_NAMES[4],
            Self::Number => HIGHLIGHT_NAMES[5],
            Self::Operator => HIGHLIGHT_NAMES[6],
            Self::Property => HIGHLIGHT_NAMES[7],
            Self::String => HIGHLIGHT_NAMES[8],
            Self::Type => HIGHLIGHT_NAMES[9],
            Self::Variable => HIGHLIGHT_NAMES[10],
        }
    }
}

/// A styled token within a line (or within a whole text for
/// [`StreamLanguage::tokenize`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamToken {
    /// Byte range
    pub range: Range<usize>,
    pub style: TokenStyle,
}

/// Per-tokenizer state carried from one line to the next
pub type StreamState = Box<dyn Any + Send>;

/// A line-oriented tokenizer, the shape legacy modes are written in.
///
/// The tokenizer sees one line at a time (without its terminator) and keeps
/// whatever it needs for multi-line constructs in the state it created.
pub trait StreamParser: Send + Sync {
    /// Name of the tokenizer
    fn name(&self) -> &str;

    /// State for the first line of a document
    fn start_state(&self) -> StreamState;

    /// Tokenize `line`, advancing `state` past it
    fn token_line(&self, line: &str, state: &mut StreamState) -> Vec<StreamToken>;
}

/// A stream parser wrapped as a language
#[derive(Clone)]
pub struct StreamLanguage {
    parser: Arc<dyn StreamParser>,
}

impl StreamLanguage {
    pub fn define(parser: Arc<dyn StreamParser>) -> Self {
        Self { parser }
    }

    pub fn name(&self) -> &str {
        self.parser.name()
    }

    pub fn parser(&self) -> &dyn StreamParser {
        self.parser.as_ref()
    }

    /// Tokenize a whole text from the start state.
    ///
    /// Token ranges are byte offsets into `text`.
    pub fn tokenize(&self, text: &str) -> Vec<StreamToken> {
        let mut state = self.parser.start_state();
        let mut tokens = Vec::new();
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            for token in self.parser.token_line(content, &mut state) {
                tokens.push(StreamToken {
                    range: offset + token.range.start..offset + token.range.end,
                    style: token.style,
                });
            }
            offset += line.len();
        }

        tokens
    }
}

impl fmt::Debug for StreamLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamLanguage")
            .field("name", &self.name())
            .finish()
    }
}

/// A tree-sitter grammar with its highlight queries compiled
pub struct GrammarLanguage {
    name: String,
    config: HighlightConfiguration,
}

impl GrammarLanguage {
    pub fn new(name: impl Into<String>, config: HighlightConfiguration) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highlight configuration, configured with [`HIGHLIGHT_NAMES`]
    pub fn config(&self) -> &HighlightConfiguration {
        &self.config
    }
}

impl fmt::Debug for GrammarLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarLanguage")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The two shapes a loaded language can take
#[derive(Debug)]
pub enum Language {
    TreeSitter(GrammarLanguage),
    Stream(StreamLanguage),
}

impl Language {
    pub fn name(&self) -> &str {
        match self {
            Language::TreeSitter(grammar) => grammar.name(),
            Language::Stream(stream) => stream.name(),
        }
    }
}

/// The capability the editor consumes to highlight one language
#[derive(Debug)]
pub struct LanguageSupport {
    language: Language,
}

impl LanguageSupport {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Adapter for legacy modes: wrap a stream parser as a stream language
    /// and that as language support, with nothing else attached.
    pub fn legacy(parser: Arc<dyn StreamParser>) -> Self {
        Self::new(Language::Stream(StreamLanguage::define(parser)))
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn name(&self) -> &str {
        self.language.name()
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.language, Language::Stream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Marks every `#` to end of line as a comment; state counts lines seen.
    struct HashComments;

    impl StreamParser for HashComments {
        fn name(&self) -> &str {
            "hash"
        }

        fn start_state(&self) -> StreamState {
            Box::new(0usize)
        }

        fn token_line(&self, line: &str, state: &mut StreamState) -> Vec<StreamToken> {
            if let Some(lines) = state.downcast_mut::<usize>() {
                *lines += 1;
            }
            match line.find('#') {
                Some(start) => vec![StreamToken {
                    range: start..line.len(),
                    style: TokenStyle::Comment,
                }],
                None => Vec::new(),
            }
        }
    }

    #[test]
    fn test_highlight_index_round_trips_names() {
        for (index, name) in HIGHLIGHT_NAMES.iter().enumerate() {
            let style = TokenStyle::from_highlight(index).unwrap();
            assert_eq!(style.as_str(), *name);
        }
        assert!(TokenStyle::from_highlight(HIGHLIGHT_NAMES.len()).is_none());
    }

    #[test]
    fn test_legacy_adapter_wraps_stream_parser() {
        let support = LanguageSupport::legacy(Arc::new(HashComments));
        assert!(support.is_stream());
        assert_eq!(support.name(), "hash");
    }

    #[test]
    fn test_tokenize_offsets_span_lines() {
        let language = StreamLanguage::define(Arc::new(HashComments));
        let text = "a = 1 # one\r\nb = 2\n# two";
        let tokens = language.tokenize(text);

        assert_eq!(tokens.len(), 2);
        assert_eq!(&text[tokens[0].range.clone()], "# one");
        assert_eq!(&text[tokens[1].range.clone()], "# two");
        assert!(tokens.iter().all(|t| t.style == TokenStyle::Comment));
    }
}
