//! Segment writer for creating new immutable segment files
//!
//! Frames are appended sequentially in one pass. The writer owns the ordering
//! invariant: every term must be strictly greater than the previous one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::codec;
use super::types::{ByteOffset, SegmentStats};
use crate::config::FrameLayout;
use crate::error::{InvFileError, Result};
use crate::models::PostingList;

/// Sequential frame writer
pub struct SegmentWriter<W: Write = File> {
    inner: BufWriter<W>,
    layout: FrameLayout,
    last_term: Option<String>,
    scratch: Vec<u8>,
    stats: SegmentStats,
}

impl SegmentWriter<File> {
    /// Create or truncate the file at `path`
    pub fn create(path: impl AsRef<Path>, layout: FrameLayout) -> Result<Self> {
        Self::new(File::create(path)?, layout)
    }
}

impl<W: Write> SegmentWriter<W> {
    pub fn new(inner: W, layout: FrameLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self {
            inner: BufWriter::new(inner),
            layout,
            last_term: None,
            scratch: Vec::new(),
            stats: SegmentStats::default(),
        })
    }

    /// Append one frame and return its starting offset
    ///
    /// A frame that fails to encode is not written at all.
    pub fn write_frame(&mut self, term: &str, postings: &PostingList) -> Result<ByteOffset> {
        if let Some(previous) = &self.last_term {
            if term <= previous.as_str() {
                return Err(InvFileError::OutOfOrder {
                    previous: previous.clone(),
                    term: term.to_string(),
                });
            }
        }

        self.scratch.clear();
        codec::encode_frame(&mut self.scratch, term, postings, &self.layout)?;
        self.inner.write_all(&self.scratch)?;

        let offset = self.stats.bytes;
        self.stats.record_frame(postings.len(), self.scratch.len());
        self.last_term = Some(term.to_string());
        Ok(offset)
    }

    pub fn stats(&self) -> SegmentStats {
        self.stats
    }

    /// Flush buffered frames
    pub fn finish(self) -> Result<SegmentStats> {
        Ok(self.into_inner()?.1)
    }

    /// Flush and hand back the underlying sink
    pub fn into_inner(self) -> Result<(W, SegmentStats)> {
        let stats = self.stats;
        let inner = self.inner.into_inner().map_err(|e| e.into_error())?;
        Ok((inner, stats))
    }
}
