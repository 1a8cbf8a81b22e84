use serde::{Deserialize, Serialize};

use super::document::DocumentId;

/// Integer weight of one term in one document
pub type Score = u64;

/// A single `(doc_id, score)` posting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingEntry {
    pub doc_id: DocumentId,
    pub score: Score,
}

impl PostingEntry {
    pub fn new(doc_id: impl Into<DocumentId>, score: Score) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

/// Postings of one term
///
/// Lists built by `insert` are ascending by doc id. Lists produced by a merge
/// are the concatenation of their inputs and are kept exactly as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    entries: Vec<PostingEntry>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries as they are, without reordering
    pub fn from_entries(entries: Vec<PostingEntry>) -> Self {
        Self { entries }
    }

    /// Insert keeping ascending doc id order; equal ids keep insertion order
    pub fn insert(&mut self, entry: PostingEntry) {
        let pos = self.entries.partition_point(|e| e.doc_id <= entry.doc_id);
        self.entries.insert(pos, entry);
    }

    /// Append all of `other` after the current entries
    pub fn concat(&mut self, other: PostingList) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PostingEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PostingEntry> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostingEntry> {
        self.entries.iter()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.entries.iter().map(|e| e.doc_id)
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a PostingEntry;
    type IntoIter = std::slice::Iter<'a, PostingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<PostingEntry> for PostingList {
    fn from_iter<I: IntoIterator<Item = PostingEntry>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}
