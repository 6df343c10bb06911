use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kanal::AsyncSender;
use lexis_config::lookup::LookupErrorPolicy;
use lexis_store::{LookupClient, WordStore};
use lexis_types::{NewWord, Notice, WordEntry};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::decode::StreamDecoder;
use crate::error::{QueryError, ValidationError};
use crate::state::{SessionId, ViewState};

/// How a single `submit` ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Rejected,
    /// The stream finished; `saved` is false when persisting failed
    Completed { word: NewWord, saved: bool },
    /// Lookup request or stream failed
    Failed,
    /// A newer submit or a selection took over the view
    Superseded,
}

/// Trim the raw input, rejecting blank text
pub fn validate_word(raw_input: &str) -> Result<String, ValidationError> {
    let word = raw_input.trim();
    if word.is_empty() {
        return Err(ValidationError);
    }
    Ok(word.to_string())
}

/// Owns the lookup lifecycle and the view state.
///
/// All methods take `&self` so the controller can be shared through an `Arc`
/// and driven from several tasks at once. Only the most recent session may
/// write to the view.
pub struct QueryController {
    store: Arc<dyn WordStore>,
    lookup: Arc<dyn LookupClient>,
    on_lookup_error: LookupErrorPolicy,
    notices: AsyncSender<Notice>,
    state: watch::Sender<ViewState>,
    next_session: AtomicU64,
    in_flight: Mutex<Option<(SessionId, CancellationToken)>>,
}

impl QueryController {
    pub fn new(
        store: Arc<dyn WordStore>,
        lookup: Arc<dyn LookupClient>,
        notices: AsyncSender<Notice>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            store,
            lookup,
            on_lookup_error: LookupErrorPolicy::default(),
            notices,
            state,
            next_session: AtomicU64::new(1),
            in_flight: Mutex::new(None),
        }
    }

    pub fn with_lookup_error_policy(mut self, policy: LookupErrorPolicy) -> Self {
        self.on_lookup_error = policy;
        self
    }

    /// Receive every view change from now on
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn is_active(&self, entry: &WordEntry) -> bool {
        self.state.borrow().selection.is_active(entry)
    }

    /// Look up a word, streaming the explanation into the view, then save it
    /// and refresh the word list
    pub async fn submit(&self, raw_input: &str) -> SubmitOutcome {
        let word = match validate_word(raw_input) {
            Ok(word) => word,
            Err(e) => {
                tracing::debug!("Rejected blank submit");
                self.notify(Notice::warning("Notice", e.to_string())).await;
                return SubmitOutcome::Rejected;
            }
        };

        let (session, cancel) = self.begin_session(&word);
        tracing::info!("Session {} looking up '{}'", session, word);

        let outcome = match self.stream_lookup(session, &cancel, &word).await {
            Ok(Some(text)) => {
                let entry = NewWord::new(word, text);
                let saved = self.persist(&entry).await;
                self.refresh().await;
                SubmitOutcome::Completed { word: entry, saved }
            }
            Ok(None) => {
                tracing::info!("Session {} superseded", session);
                SubmitOutcome::Superseded
            }
            Err(e) => {
                self.report_lookup_failure(&word, &e).await;
                SubmitOutcome::Failed
            }
        };

        self.end_session(session);
        outcome
    }

    /// Show a stored entry. Any running lookup stops writing to the view.
    pub fn select_existing(&self, entry: &WordEntry) {
        let mut in_flight = self.lock_in_flight();
        if let Some((session, cancel)) = in_flight.take() {
            tracing::debug!("Selection cancels session {}", session);
            cancel.cancel();
        }
        self.state.send_modify(|state| state.select(entry));
    }

    /// Fetch the word list and replace the local copy
    pub async fn refresh(&self) -> bool {
        match self.store.list_all().await {
            Ok(words) => {
                tracing::debug!("Word list refreshed, {} entries", words.len());
                self.state.send_modify(|state| state.replace_words(words));
                true
            }
            Err(e) => {
                tracing::error!("Failed to load word list: {}", e);
                self.notify(Notice::error("Warning", format!("Failed to load word list: {e}")))
                    .await;
                false
            }
        }
    }

    /// Delete an entry from the backend, then from the local list
    pub async fn delete(&self, entry: &WordEntry) -> bool {
        match self.store.delete(entry).await {
            Ok(()) => {
                tracing::info!("Deleted '{}' ({})", entry.word, entry.id);
                self.state
                    .send_if_modified(|state| state.remove_word(&entry.id));
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete '{}': {}", entry.word, e);
                self.notify(Notice::error(
                    "Warning",
                    format!("Failed to delete '{}': {e}", entry.word),
                ))
                .await;
                false
            }
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<(SessionId, CancellationToken)>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand the view to a new session.
    ///
    /// Id allocation, the in-flight swap and the view update happen under one
    /// lock, so the session that publishes last is always the newest one.
    fn begin_session(&self, word: &str) -> (SessionId, CancellationToken) {
        let mut in_flight = self.lock_in_flight();
        let session = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();

        if let Some((old, old_cancel)) = in_flight.replace((session, cancel.clone())) {
            tracing::debug!("Session {} replaces {}", session, old);
            old_cancel.cancel();
        }

        self.state.send_modify(|state| state.begin(session, word));
        (session, cancel)
    }

    fn end_session(&self, session: SessionId) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.as_ref().is_some_and(|(id, _)| *id == session) {
            in_flight.take();
        }
        self.state.send_if_modified(|state| state.finish(session));
    }

    /// Drive the lookup stream into the view.
    ///
    /// Returns the full text on completion, `None` when the session lost the
    /// view before the stream ended.
    async fn stream_lookup(
        &self,
        session: SessionId,
        cancel: &CancellationToken,
        word: &str,
    ) -> Result<Option<String>, QueryError> {
        let body = tokio::select! {
            _ = cancel.cancelled() => return Ok(None),
            body = self.lookup.lookup(word) => body?,
        };

        let mut decoder = StreamDecoder::new(body);
        let mut text = String::new();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Ok(None),
                next = decoder.next_fragment() => next,
            };

            let Some(fragment) = next else {
                break;
            };
            let fragment = fragment?;
            tracing::debug!("Session {} received {} bytes", session, fragment.len());

            let mut applied = false;
            self.state.send_if_modified(|state| {
                applied = state.append(session, &fragment);
                applied
            });
            if !applied {
                return Ok(None);
            }
            text.push_str(&fragment);
        }

        tracing::info!("Session {} stream completed, {} bytes", session, text.len());

        if !self.state.borrow().is_current(session) {
            return Ok(None);
        }
        Ok(Some(text))
    }

    async fn persist(&self, entry: &NewWord) -> bool {
        match self.store.save(entry).await {
            Ok(()) => {
                tracing::info!("Saved '{}'", entry.word);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save '{}': {}", entry.word, e);
                self.notify(Notice::error(
                    "Warning",
                    format!("Failed to save '{}': {e}", entry.word),
                ))
                .await;
                false
            }
        }
    }

    async fn report_lookup_failure(&self, word: &str, error: &QueryError) {
        match self.on_lookup_error {
            LookupErrorPolicy::Silent => {
                tracing::warn!("Lookup for '{}' failed: {}", word, error);
            }
            LookupErrorPolicy::Notify => {
                tracing::error!("Lookup for '{}' failed: {}", word, error);
                self.notify(Notice::error(
                    "Warning",
                    format!("Lookup for '{word}' failed: {error}"),
                ))
                .await;
            }
        }
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.notices.send(notice).await {
            tracing::warn!("Notice dropped: {}", e);
        }
    }
}
