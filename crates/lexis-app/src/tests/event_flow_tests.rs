use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use kanal::{AsyncReceiver, AsyncSender};
use lexis_config::Config;
use lexis_core::{QueryController, ViewState};
use lexis_store::{ByteStream, LookupClient, TransportError, WordStore};
use lexis_types::{AppEvent, EntryRef, NewWord, Notice, NoticeLevel, WordEntry};
use pretty_assertions::assert_eq;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::state::AppState;

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct MemoryStore {
    words: Mutex<Vec<WordEntry>>,
}

#[async_trait::async_trait]
impl WordStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<WordEntry>, TransportError> {
        Ok(self.words.lock().unwrap().clone())
    }

    async fn save(&self, word: &NewWord) -> Result<(), TransportError> {
        let mut words = self.words.lock().unwrap();
        words.retain(|entry| entry.word != word.word);
        words.push(WordEntry {
            word: word.word.clone(),
            description: word.description.clone(),
            id: format!("id-{}", word.word),
        });
        Ok(())
    }

    async fn delete(&self, entry: &WordEntry) -> Result<(), TransportError> {
        self.words.lock().unwrap().retain(|stored| stored.id != entry.id);
        Ok(())
    }
}

impl MemoryStore {
    fn words(&self) -> Vec<WordEntry> {
        self.words.lock().unwrap().clone()
    }
}

/// Explains every word the same way, in two chunks
#[derive(Default)]
struct EchoLookup {
    delay: Duration,
}

#[async_trait::async_trait]
impl LookupClient for EchoLookup {
    async fn lookup(&self, word: &str) -> Result<ByteStream, TransportError> {
        tokio::time::sleep(self.delay).await;
        let chunks = vec![
            Ok(Bytes::from(format!("{word} means "))),
            Ok(Bytes::from_static(b"something.")),
        ];
        Ok(futures_util::stream::iter(chunks).boxed())
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    input: AsyncSender<AppEvent>,
    to_ui: AsyncReceiver<AppEvent>,
    notices: AsyncReceiver<Notice>,
    view: tokio::sync::watch::Receiver<ViewState>,
    cancel: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(words: Vec<WordEntry>) -> Self {
        Self::with_lookup(words, EchoLookup::default())
    }

    fn with_lookup(words: Vec<WordEntry>, lookup: EchoLookup) -> Self {
        let store = Arc::new(MemoryStore {
            words: Mutex::new(words),
        });
        let (notice_tx, notice_rx) = kanal::unbounded_async();
        let controller = QueryController::new(store.clone(), Arc::new(lookup), notice_tx.clone());
        let state = Arc::new(AppState::with_controller(
            Config::default(),
            Arc::new(controller),
            notice_tx,
        ));

        let (input_tx, input_rx) = kanal::unbounded_async();
        let (ui_tx, ui_rx) = kanal::unbounded_async();
        let cancel = CancellationToken::new();
        let view = state.controller.subscribe();
        let task = tokio::spawn(event_loop(state, input_rx, ui_tx, cancel.clone()));

        Self {
            store,
            input: input_tx,
            to_ui: ui_rx,
            notices: notice_rx,
            view,
            cancel,
            task,
        }
    }

    async fn send(&self, event: AppEvent) {
        self.input.send(event).await.unwrap();
    }

    async fn wait_for(&mut self, check: impl FnMut(&ViewState) -> bool) -> ViewState {
        timeout(WAIT, self.view.wait_for(check))
            .await
            .expect("view never reached the expected state")
            .expect("view closed")
            .clone()
    }

    async fn next_notice(&self) -> Notice {
        timeout(WAIT, self.notices.recv())
            .await
            .expect("no notice arrived")
            .unwrap()
    }
}

fn entry(word: &str, description: &str, id: &str) -> WordEntry {
    WordEntry {
        word: word.to_string(),
        description: description.to_string(),
        id: id.to_string(),
    }
}

#[tokio::test]
async fn submit_streams_saves_and_lists() {
    let mut harness = Harness::start(Vec::new());

    harness.send(AppEvent::Submit("  apple ".to_string())).await;

    let view = harness
        .wait_for(|view| !view.loading && !view.words.is_empty())
        .await;
    assert_eq!(view.selection.current_text, "apple means something.");
    assert_eq!(view.words, vec![entry("apple", "apple means something.", "id-apple")]);
    assert!(view.selection.is_active(&view.words[0]));
}

#[tokio::test]
async fn refresh_then_select_by_position() {
    let mut harness = Harness::start(vec![
        entry("apple", "A fruit.", "a1"),
        entry("pear", "Another fruit.", "p1"),
    ]);

    harness.send(AppEvent::Refresh).await;
    harness.wait_for(|view| view.words.len() == 2).await;

    harness.send(AppEvent::Select(EntryRef::Index(2))).await;
    let view = harness
        .wait_for(|view| view.selection.active_word() == Some("pear"))
        .await;
    assert_eq!(view.selection.current_text, "Another fruit.");
    assert!(!view.loading);
}

#[tokio::test]
async fn unknown_entries_raise_a_notice() {
    let harness = Harness::start(Vec::new());

    harness.send(AppEvent::Select(EntryRef::Index(4))).await;
    let notice = harness.next_notice().await;
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.message, "No word at position 4");

    harness
        .send(AppEvent::Delete(EntryRef::Word("kiwi".to_string())))
        .await;
    assert_eq!(harness.next_notice().await.message, "'kiwi' is not in the list");
}

#[tokio::test]
async fn blank_submit_is_rejected_with_a_notice() {
    let harness = Harness::start(Vec::new());

    harness.send(AppEvent::Submit("   ".to_string())).await;

    let notice = harness.next_notice().await;
    assert_eq!(notice.message, "Please enter a word");
    assert_eq!(*harness.view.borrow(), ViewState::default());
}

#[tokio::test]
async fn delete_by_word_removes_and_confirms() {
    let mut harness = Harness::start(vec![entry("apple", "A fruit.", "a1")]);

    harness.send(AppEvent::Refresh).await;
    harness.wait_for(|view| view.words.len() == 1).await;

    harness
        .send(AppEvent::Delete(EntryRef::Word("apple".to_string())))
        .await;

    let notice = harness.next_notice().await;
    assert_eq!(notice, Notice::info("Deleted", "apple"));
    harness.wait_for(|view| view.words.is_empty()).await;
}

#[tokio::test]
async fn list_and_help_go_to_the_ui() {
    let harness = Harness::start(Vec::new());

    harness.send(AppEvent::ShowList).await;
    harness.send(AppEvent::Help).await;

    let first = timeout(WAIT, harness.to_ui.recv()).await.unwrap().unwrap();
    let second = timeout(WAIT, harness.to_ui.recv()).await.unwrap().unwrap();
    assert_eq!((first, second), (AppEvent::ShowList, AppEvent::Help));
}

#[tokio::test]
async fn quit_stops_the_loop_and_cancels() {
    let harness = Harness::start(Vec::new());

    harness.send(AppEvent::Quit).await;

    let result = timeout(WAIT, harness.task).await.unwrap().unwrap();
    assert!(result.is_ok());
    assert!(harness.cancel.is_cancelled());
}

#[tokio::test]
async fn quit_waits_for_a_running_lookup() {
    let harness = Harness::with_lookup(
        Vec::new(),
        EchoLookup {
            delay: Duration::from_millis(50),
        },
    );

    harness.send(AppEvent::Submit("apple".to_string())).await;
    harness.send(AppEvent::Quit).await;

    let result = timeout(WAIT, harness.task).await.unwrap().unwrap();
    assert!(result.is_ok());
    // Nothing else runs after the loop returns, the save must already be done
    assert_eq!(
        harness.store.words(),
        vec![entry("apple", "apple means something.", "id-apple")]
    );
    assert!(!harness.view.borrow().loading);
}
