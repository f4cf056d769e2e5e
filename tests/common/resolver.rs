//! Test resolver that counts imports and can hold them until released

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fresh_languages::{
    LanguageModule, LoadError, ModuleResolver, ModuleTable, StaticModule, StreamParser,
    StreamState, StreamToken, TokenStyle,
};
use tokio::sync::Notify;

/// Styles every word as a keyword
pub struct Words;

impl StreamParser for Words {
    fn name(&self) -> &str {
        "words"
    }

    fn start_state(&self) -> StreamState {
        Box::new(())
    }

    fn token_line(&self, line: &str, _state: &mut StreamState) -> Vec<StreamToken> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        for word in line.split(' ') {
            if !word.is_empty() {
                tokens.push(StreamToken {
                    range: offset..offset + word.len(),
                    style: TokenStyle::Keyword,
                });
            }
            offset += word.len() + 1;
        }
        tokens
    }
}

/// Resolver over a single `legacy-modes/mode/words` module exporting
/// [`Words`] as `words`
pub struct CountingResolver {
    modules: ModuleTable,
    imports: AtomicUsize,
    failures_left: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self {
            modules: ModuleTable::new().with(
                StaticModule::new("legacy-modes/mode/words")
                    .with_stream_parser("words", Arc::new(Words)),
            ),
            imports: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Every import waits for a permit from `gate`
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    /// The next `count` imports fail with `ModuleNotFound`
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn imports(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleResolver for CountingResolver {
    async fn import(&self, module: &str) -> Result<Arc<dyn LanguageModule>, LoadError> {
        self.imports.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if fail {
            return Err(LoadError::ModuleNotFound {
                module: module.to_string(),
            });
        }

        self.modules.import(module).await
    }
}
