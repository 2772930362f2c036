//! Append-only transcript of sent and received text.

use std::fmt;

/// Which way a transcript entry travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Directional marker shown in front of the entry text.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Sent => "→ ",
            Self::Received => "← ",
        }
    }
}

/// One recorded message event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    text: String,
    direction: Direction,
}

impl TranscriptEntry {
    /// An entry for text the user sent.
    pub fn sent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Sent,
        }
    }

    /// An entry for text that arrived from the server.
    pub fn received(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Received,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.marker(), self.text)
    }
}

/// Ordered log of entries. Insertion order is display order; entries are
/// never removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
