//! Memoized, shared loading of one descriptor's language support
//!
//! The cell is in one of three states:
//! - **Idle**: nothing loaded, nothing in flight
//! - **Loading**: a background task is running the loader; callers wait on a
//!   watch channel that will carry its single outcome
//! - **Ready**: the support object, returned to every later caller
//!
//! The loader runs on a spawned task, not in the caller's future, so a caller
//! that stops waiting does not cancel the load or leave the cell stuck.
//! Failures go to everyone already waiting and put the cell back to Idle.
//! A loader that panics counts as a failure, whether or not anyone waits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::LoadError;
use crate::loader::LoadFuture;
use crate::support::LanguageSupport;

type Outcome = Result<Arc<LanguageSupport>, LoadError>;

enum State {
    Idle,
    Loading(watch::Receiver<Option<Outcome>>),
    Ready(Arc<LanguageSupport>),
}

pub(crate) struct LoadCell {
    state: Mutex<State>,
}

impl LoadCell {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Idle),
        }
    }

    pub fn ready(support: Arc<LanguageSupport>) -> Self {
        Self {
            state: Mutex::new(State::Ready(support)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Option<Arc<LanguageSupport>> {
        match &*self.lock() {
            State::Ready(support) => Some(Arc::clone(support)),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(&*self.lock(), State::Loading(_))
    }

    /// Return the cached support, join the load in flight, or start one with
    /// `start`. `start` is only called when this caller begins a new load.
    ///
    /// # Panics
    /// When a new load has to start outside a Tokio runtime.
    pub async fn get_or_load<F>(self: &Arc<Self>, language: &str, start: F) -> Outcome
    where
        F: FnOnce() -> LoadFuture,
    {
        let mut rx = {
            let mut state = self.lock();
            match &*state {
                State::Ready(support) => return Ok(Arc::clone(support)),
                State::Loading(rx) => {
                    tracing::trace!("Joining in-flight load of {}", language);
                    rx.clone()
                }
                State::Idle => {
                    let (tx, rx) = watch::channel(None);
                    *state = State::Loading(rx.clone());

                    tracing::debug!("Loading language support for {}", language);
                    let load = start();
                    let cell = Arc::clone(self);
                    let language = language.to_string();
                    tokio::spawn(async move {
                        // The loader runs in its own task so a panic still settles the cell
                        let outcome = match tokio::spawn(load).await {
                            Ok(result) => result.map(Arc::new),
                            Err(e) => {
                                tracing::error!("Loader for {} did not finish: {}", language, e);
                                Err(LoadError::Interrupted {
                                    language: language.clone(),
                                })
                            }
                        };
                        cell.finish(&language, &outcome);
                        // Nobody may be waiting any more; the cell already has the result.
                        let _ = tx.send(Some(outcome));
                    });
                    rx
                }
            }
        };

        let outcome = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| (*value).clone());

        match outcome {
            Some(outcome) => outcome,
            None => {
                self.abandon(&rx);
                Err(LoadError::Interrupted {
                    language: language.to_string(),
                })
            }
        }
    }

    fn finish(&self, language: &str, outcome: &Outcome) {
        let mut state = self.lock();
        match outcome {
            Ok(support) => {
                tracing::debug!("Loaded language support for {}", language);
                *state = State::Ready(Arc::clone(support));
            }
            Err(e) => {
                tracing::warn!("Failed to load language support for {}: {}", language, e);
                *state = State::Idle;
            }
        }
    }

    /// The task behind `rx` went away without reporting; let the next caller
    /// start over. Leaves the cell alone if a newer load has replaced it.
    fn abandon(&self, rx: &watch::Receiver<Option<Outcome>>) {
        let mut state = self.lock();
        if let State::Loading(current) = &*state {
            if current.same_channel(rx) {
                *state = State::Idle;
            }
        }
    }
}
