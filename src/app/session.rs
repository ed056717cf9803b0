use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    hints::HintRules,
    media::ExtractResult,
    normalize::{find_url_in_text, normalize_input_url},
    store::{HistoryEntry, PersistentStore, Preferences},
};

use super::{
    backend::ExtractBackend,
    errors::ExtractError,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Where a submission came from. Repeated submissions of the same URL from the
/// same trigger while loading are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Form,
    Paste,
    Share,
}

/// UI events, issued to the session instead of being wired as listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Paste(String),
    Share(String),
}

#[derive(Debug)]
pub enum Submission {
    /// A request is in flight; the handle resolves once its outcome is applied.
    Started(JoinHandle<()>),
    /// Duplicate of the request already in flight.
    Ignored,
    /// Input did not contain a usable URL. No request was made.
    Rejected,
    /// Shared URL that should be put in the input box without analyzing it.
    Prefilled(String),
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub phase: Phase,
    /// normalized URL of the current request or result
    pub source: Option<String>,
    pub result: Option<Arc<ExtractResult>>,
    pub error_message: Option<String>,
    pub hints: Vec<String>,
}

struct Inflight {
    token: CancellationToken,
    trigger: Trigger,
    url: String,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    // bumped whenever a request is issued or superseded; late outcomes
    // carrying an older generation are dropped
    generation: u64,
    inflight: Option<Inflight>,
}

impl Inner {
    fn supersede(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            log::debug!("cancelling in-flight extraction of {}", inflight.url);
            inflight.token.cancel();
        }
        self.generation += 1;
    }
}

/// Owns the single-flight extraction lifecycle and the current result.
#[derive(Clone)]
pub struct ExtractionSession {
    backend: Arc<dyn ExtractBackend>,
    store: Arc<PersistentStore>,
    hints: Arc<HintRules>,
    inner: Arc<Mutex<Inner>>,
}

impl ExtractionSession {
    pub fn new(
        backend: Arc<dyn ExtractBackend>,
        store: Arc<PersistentStore>,
        hints: HintRules,
    ) -> Self {
        Self {
            backend,
            store,
            hints: Arc::new(hints),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Validate `raw` and, if it holds a URL, start extracting it. Any request
    /// already in flight is cancelled first. Must be called within a tokio runtime.
    pub fn submit(&self, raw: &str, trigger: Trigger) -> Submission {
        let Some(url) = normalize_input_url(raw) else {
            let mut inner = self.lock();
            inner.supersede();
            inner.state = SessionState {
                phase: Phase::Failed,
                error_message: Some(ExtractError::Validation.to_string()),
                ..Default::default()
            };
            log::debug!("rejected input {raw:?}");
            return Submission::Rejected;
        };

        let (generation, token) = {
            let mut inner = self.lock();

            if let Some(inflight) = &inner.inflight {
                if inflight.trigger == trigger
                    && inflight.url == url
                    && !inflight.token.is_cancelled()
                {
                    log::debug!("ignoring duplicate {trigger:?} submission of {url}");
                    return Submission::Ignored;
                }
            }

            inner.supersede();
            let token = CancellationToken::new();
            inner.inflight = Some(Inflight {
                token: token.clone(),
                trigger,
                url: url.clone(),
            });
            inner.state = SessionState {
                phase: Phase::Loading,
                source: Some(url.clone()),
                ..Default::default()
            };

            (inner.generation, token)
        };

        let session = self.clone();
        let span = tracing::debug_span!("extract", generation, ?trigger);
        Submission::Started(tokio::spawn(
            async move { session.run(generation, url, token).await }.instrument(span),
        ))
    }

    async fn run(&self, generation: u64, url: String, token: CancellationToken) {
        let outcome = self.backend.extract(&url, &token).await;
        let outcome = if token.is_cancelled() {
            Err(ExtractError::Cancelled)
        } else {
            outcome
        };

        let succeeded = {
            let mut inner = self.lock();
            if inner.generation != generation {
                log::debug!("dropping superseded outcome for {url}");
                return;
            }
            inner.inflight = None;

            match outcome {
                Ok(result) => {
                    log::info!(
                        "extracted {} formats from {url}",
                        result.formats.len()
                    );
                    let result = Arc::new(result);
                    inner.state = SessionState {
                        phase: Phase::Succeeded,
                        source: Some(url.clone()),
                        result: Some(result.clone()),
                        error_message: None,
                        hints: Vec::new(),
                    };
                    Some(result)
                }
                Err(ExtractError::Cancelled) => {
                    log::debug!("extraction of {url} cancelled");
                    inner.state = SessionState::default();
                    None
                }
                Err(err) => {
                    match &err {
                        ExtractError::Transport(cause) => {
                            log::warn!("extraction of {url} failed: {cause}")
                        }
                        ExtractError::Request { status, message } => {
                            log::warn!("extraction of {url} failed with {status}: {message}")
                        }
                        _ => log::warn!("extraction of {url} failed: {err}"),
                    }
                    let message = err.to_string();
                    inner.state = SessionState {
                        phase: Phase::Failed,
                        source: Some(url.clone()),
                        result: None,
                        hints: self.hints.hints_for(&message),
                        error_message: Some(message),
                    };
                    None
                }
            }
        };

        if let Some(result) = succeeded {
            let entry = HistoryEntry::from_result(&url, &result);
            if let Err(err) = self.store.push_history(entry) {
                log::warn!("failed to record history for {url}: {err}");
            }
        }
    }

    /// Abort the in-flight request, if any. The session returns to `Idle`
    /// once the request observes the cancellation.
    pub fn cancel(&self) {
        if let Some(inflight) = &self.lock().inflight {
            inflight.token.cancel();
        }
    }

    /// Drop the current result and error, returning the page URL of the result
    /// so it can be put back in the input box.
    pub fn reset(&self) -> Option<String> {
        let mut inner = self.lock();
        inner.supersede();
        let state = std::mem::take(&mut inner.state);

        state
            .result
            .and_then(|result| result.webpage_url.clone())
            .or(state.source)
    }

    pub fn dispatch(&self, command: Command, prefs: &Preferences) -> Submission {
        match command {
            Command::Submit(text) => self.submit(&text, Trigger::Form),
            Command::Paste(text) => self.submit(&text, Trigger::Paste),
            Command::Share(text) => match find_url_in_text(&text) {
                Some(url) if prefs.auto_analyze_on_share => self.submit(&url, Trigger::Share),
                Some(url) => Submission::Prefilled(url),
                None => self.submit(&text, Trigger::Share),
            },
        }
    }
}
