//! Chat transcript

use chrono::{DateTime, Utc};
use std::fmt;

/// Who produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Status notes: document loaded, searching, errors
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(uuid::Uuid);

impl EntryId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Ordered, append-only log of chat entries.
///
/// The one exception to append-only is [`Transcript::remove_placeholder`].
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id
    pub fn push(&mut self, role: Role, text: impl Into<String>) -> EntryId {
        let id = EntryId::new();
        self.entries.push(Entry {
            id,
            role,
            text: text.into(),
            at: Utc::now(),
        });
        id
    }

    /// Remove a transient system entry.
    ///
    /// Only removes when `id` is still the most recent entry and is a system
    /// entry; anything else leaves the transcript untouched. Returns whether
    /// an entry was removed, so calling it twice removes at most once.
    pub fn remove_placeholder(&mut self, id: EntryId) -> bool {
        match self.entries.last() {
            Some(last) if last.id == id && last.role == Role::System => {
                self.entries.pop();
                true
            }
            _ => false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended after the first `from`
    pub fn since(&self, from: usize) -> &[Entry] {
        &self.entries[from.min(self.entries.len())..]
    }
}
