//! Term dictionary using FST (Finite State Transducer)
//!
//! Maps every term of a segment to the byte offset of its frame. Built from a
//! key scan, so no posting payload is decoded. Lookups are O(|key|) and prefix
//! queries stream only the matching range.

use std::path::Path;

use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

use super::store::{read_frame_at, scan_keys};
use super::types::{ByteOffset, Frame};
use crate::config::FrameLayout;
use crate::error::Result;

/// Term to frame offset map backed by an FST
pub struct TermDictionary {
    fst: Map<Vec<u8>>,
}

impl TermDictionary {
    /// Build from `(term, offset)` pairs; terms must be strictly ascending
    pub fn from_entries<I, T>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, ByteOffset)>,
        T: AsRef<[u8]>,
    {
        let mut builder = MapBuilder::memory();
        for (term, offset) in entries {
            builder.insert(term, offset)?;
        }
        Self::from_bytes(builder.into_inner()?)
    }

    /// Scan the segment at `path` and index every frame's offset
    pub fn from_segment(path: impl AsRef<Path>, layout: FrameLayout) -> Result<Self> {
        Self::from_entries(scan_keys(path, layout)?)
    }

    /// Reopen a dictionary from bytes returned by [`fst_bytes`](Self::fst_bytes)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            fst: Map::new(bytes)?,
        })
    }

    /// Offset of the frame holding `term`
    pub fn get(&self, term: &str) -> Option<ByteOffset> {
        self.fst.get(term.as_bytes())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.fst.contains_key(term.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// All terms starting with `prefix`, in ascending order
    pub fn prefix_search(&self, prefix: &str) -> Vec<(String, ByteOffset)> {
        let matcher = Str::new(prefix).starts_with();
        collect(self.fst.search(matcher).into_stream())
    }

    /// Every term with its offset, in ascending order
    pub fn iter_terms(&self) -> Vec<(String, ByteOffset)> {
        collect(self.fst.stream())
    }

    /// Raw FST bytes, for persisting the dictionary next to its segment
    pub fn fst_bytes(&self) -> &[u8] {
        self.fst.as_fst().as_bytes()
    }

    /// Read the frame of `term` from the segment this dictionary was built on
    pub fn fetch(
        &self,
        path: impl AsRef<Path>,
        term: &str,
        layout: FrameLayout,
    ) -> Result<Option<Frame>> {
        match self.get(term) {
            Some(offset) => read_frame_at(path, offset, layout).map(Some),
            None => Ok(None),
        }
    }
}

fn collect<S>(mut stream: S) -> Vec<(String, ByteOffset)>
where
    S: for<'a> Streamer<'a, Item = (&'a [u8], u64)>,
{
    let mut results = Vec::new();
    while let Some((key, offset)) = stream.next() {
        if let Ok(term) = std::str::from_utf8(key) {
            results.push((term.to_string(), offset));
        }
    }
    results
}
