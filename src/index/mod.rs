//! In-memory inverted index
//!
//! Terms map to posting lists in a `BTreeMap`, so iteration is always in
//! ascending byte order of the term. That is the order segments are written in.

pub mod scoring;

use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::models::{Document, PostingEntry, PostingList};
pub use scoring::{BuiltinScorer, NormalizedFrequency, Scorer, TermFrequency, TermLength};

/// Mapping from term to posting list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    terms: BTreeMap<String, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in ascending order
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PostingList> {
        self.terms.iter()
    }

    /// Replace the posting list of `term`, returning the previous one
    pub fn insert(&mut self, term: String, postings: PostingList) -> Option<PostingList> {
        self.terms.insert(term, postings)
    }

    /// Total number of postings across all terms
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(PostingList::len).sum()
    }

    fn add_posting(&mut self, term: &str, entry: PostingEntry) {
        match self.terms.get_mut(term) {
            Some(list) => list.insert(entry),
            None => {
                let mut list = PostingList::new();
                list.insert(entry);
                self.terms.insert(term.to_string(), list);
            }
        }
    }
}

impl<'a> IntoIterator for &'a InvertedIndex {
    type Item = (&'a String, &'a PostingList);
    type IntoIter = btree_map::Iter<'a, String, PostingList>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl FromIterator<(String, PostingList)> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = (String, PostingList)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Builds an [`InvertedIndex`] one document at a time
pub struct IndexBuilder<S: Scorer> {
    index: InvertedIndex,
    scorer: S,
    documents: usize,
}

impl<S: Scorer> IndexBuilder<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            index: InvertedIndex::new(),
            scorer,
            documents: 0,
        }
    }

    /// Index every distinct token of `document`
    ///
    /// The scorer runs once per distinct token, in order of first occurrence.
    /// Adding the same document twice adds its postings twice.
    pub fn add_document(&mut self, document: &Document) {
        let mut seen = HashSet::new();
        for token in document.text() {
            if !seen.insert(token.as_str()) {
                continue;
            }
            let score = self.scorer.score(token, document);
            self.index
                .add_posting(token, PostingEntry::new(document.id(), score));
        }
        self.documents += 1;
    }

    pub fn add_documents<'a>(&mut self, documents: impl IntoIterator<Item = &'a Document>) {
        for document in documents {
            self.add_document(document);
        }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn finish(self) -> InvertedIndex {
        debug!(
            documents = self.documents,
            terms = self.index.len(),
            postings = self.index.posting_count(),
            "Built index"
        );
        self.index
    }
}

/// Build an index over `documents`, scoring each `(term, document)` pair
pub fn build_index<'a, S: Scorer>(
    documents: impl IntoIterator<Item = &'a Document>,
    scorer: S,
) -> InvertedIndex {
    let mut builder = IndexBuilder::new(scorer);
    builder.add_documents(documents);
    builder.finish()
}
