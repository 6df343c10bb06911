use serde::{Deserialize, Serialize};

/// A stored word and its explanation, as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(rename = "desc", alias = "description", default)]
    pub description: String,
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

/// Create-or-update payload; the backend assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    #[serde(rename = "desc", alias = "description")]
    pub description: String,
}

impl NewWord {
    pub fn new(word: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Non-blocking user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, title, message)
    }

    fn with_level(
        level: NoticeLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Points at an entry in the word list the way a user types it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    /// 1-based position in the displayed list
    Index(usize),
    Word(String),
}

impl EntryRef {
    pub fn resolve<'a>(&self, words: &'a [WordEntry]) -> Option<&'a WordEntry> {
        match self {
            EntryRef::Index(n) => n.checked_sub(1).and_then(|i| words.get(i)),
            EntryRef::Word(word) => words.iter().find(|entry| &entry.word == word),
        }
    }
}

/// User intents forwarded from the input side to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Submit(String),
    Select(EntryRef),
    Delete(EntryRef),
    ShowList,
    Refresh,
    Help,
    Quit,
}
