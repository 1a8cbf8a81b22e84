//! Core types for segment files

use serde::{Deserialize, Serialize};

use crate::models::PostingList;

/// Byte offset of a frame's first byte within its segment file
pub type ByteOffset = u64;

/// Decoded key portion of a frame; the payload is still unread
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub term: String,
    pub offset: ByteOffset,
    /// Length in bytes of the posting payload that follows the header
    pub payload_len: u64,
}

/// A fully decoded `(term, posting list)` frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub term: String,
    pub postings: PostingList,
    pub offset: ByteOffset,
}

/// Counters reported after writing a segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub frames: u64,
    pub postings: u64,
    pub bytes: u64,
}

impl SegmentStats {
    pub fn record_frame(&mut self, postings: usize, bytes: usize) {
        self.frames += 1;
        self.postings += postings as u64;
        self.bytes += bytes as u64;
    }
}
