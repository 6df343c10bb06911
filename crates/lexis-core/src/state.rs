use std::fmt;

use lexis_types::WordEntry;

/// Identifies one submit, from validation to list refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The word shown in the main view.
///
/// `id` is only known once the word exists in the backend; until then the
/// word text is its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWord {
    pub word: String,
    pub id: Option<String>,
}

impl ActiveWord {
    pub fn matches(&self, entry: &WordEntry) -> bool {
        match &self.id {
            Some(id) => *id == entry.id,
            None => self.word == entry.word,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub active: Option<ActiveWord>,
    /// Stored description, or the streamed prefix while a lookup runs
    pub current_text: String,
}

impl SelectionState {
    pub fn active_word(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.word.as_str())
    }

    pub fn is_active(&self, entry: &WordEntry) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.matches(entry))
    }
}

/// Everything the views render, published by the controller on each change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub selection: SelectionState,
    /// A lookup is in flight, submission should be disabled
    pub loading: bool,
    pub words: Vec<WordEntry>,
    /// Session allowed to write streamed text
    pub session: Option<SessionId>,
}

impl ViewState {
    pub fn is_current(&self, session: SessionId) -> bool {
        self.session == Some(session)
    }

    /// Start streaming for `word`, superseding any running session
    pub fn begin(&mut self, session: SessionId, word: &str) {
        self.selection.active = Some(ActiveWord {
            word: word.to_string(),
            id: None,
        });
        self.selection.current_text.clear();
        self.loading = true;
        self.session = Some(session);
    }

    /// Append a fragment if `session` still owns the view
    pub fn append(&mut self, session: SessionId, fragment: &str) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.selection.current_text.push_str(fragment);
        true
    }

    /// Show a stored entry, detaching any running session
    pub fn select(&mut self, entry: &WordEntry) {
        self.selection.active = Some(ActiveWord {
            word: entry.word.clone(),
            id: Some(entry.id.clone()),
        });
        self.selection.current_text = entry.description.clone();
        self.loading = false;
        self.session = None;
    }

    /// End `session`, clearing `loading` unless a newer session owns the view
    pub fn finish(&mut self, session: SessionId) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.loading = false;
        self.session = None;
        true
    }

    /// Replace the word list and pick up the id of a freshly saved active word
    pub fn replace_words(&mut self, words: Vec<WordEntry>) {
        if let Some(active) = self.selection.active.as_mut()
            && active.id.is_none()
            && let Some(entry) = words.iter().find(|entry| entry.word == active.word)
        {
            active.id = Some(entry.id.clone());
        }
        self.words = words;
    }

    pub fn remove_word(&mut self, id: &str) -> bool {
        let before = self.words.len();
        self.words.retain(|entry| entry.id != id);
        self.words.len() != before
    }
}
