//! Streaming segment reader
//!
//! Reads frames front to back through a buffered handle. Headers are decoded
//! separately from payloads so callers can skip a posting list by seeking over
//! its declared byte length instead of decoding it.
//!
//! End of stream is only recognised when no byte at all is left where a new
//! frame would start. Every declared length is checked against the bytes that
//! remain in the file, so a cut-off frame is reported as
//! [`InvFileError::TruncatedFrame`] instead of passing for a clean end.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::codec;
use super::types::{ByteOffset, Frame, FrameHeader};
use crate::config::{FrameLayout, KEY_LEN_WIDTH, LIST_LEN_WIDTH};
use crate::error::{InvFileError, Result};
use crate::models::PostingList;

/// Forward-only frame reader over a seekable source
pub struct SegmentReader<R: Read + Seek = File> {
    inner: BufReader<R>,
    layout: FrameLayout,
    /// Current byte position in the source
    pos: u64,
    /// Total byte length of the source, captured at open
    len: u64,
    /// Header of the frame whose payload has not been consumed yet
    pending: Option<FrameHeader>,
}

impl SegmentReader<File> {
    pub fn open(path: impl AsRef<Path>, layout: FrameLayout) -> Result<Self> {
        Self::new(File::open(path)?, layout)
    }
}

impl<R: Read + Seek> SegmentReader<R> {
    pub fn new(mut inner: R, layout: FrameLayout) -> Result<Self> {
        layout.validate()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: BufReader::new(inner),
            layout,
            pos: 0,
            len,
            pending: None,
        })
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Byte position of the next unread byte
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total length of the segment in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode the next frame's key and payload length
    ///
    /// Any payload left unread from the previous header is skipped first.
    /// Returns `None` at a clean end of stream.
    pub fn next_header(&mut self) -> Result<Option<FrameHeader>> {
        self.skip_postings()?;

        let offset = self.pos;
        if offset == self.len {
            return Ok(None);
        }

        let mut prefix = [0u8; KEY_LEN_WIDTH];
        self.read_exact(&mut prefix, offset)?;
        let key_len = codec::decode_number(&prefix)? as usize;

        self.ensure_remaining(key_len as u64 + LIST_LEN_WIDTH as u64, offset)?;
        let mut key = vec![0u8; key_len];
        self.read_exact(&mut key, offset)?;
        let term = codec::decode_key(key)?;

        let mut list_len = [0u8; LIST_LEN_WIDTH];
        self.read_exact(&mut list_len, offset)?;
        let payload_len = codec::decode_number(&list_len)? as u64;
        self.ensure_remaining(payload_len, offset)?;

        let header = FrameHeader {
            term,
            offset,
            payload_len,
        };
        self.pending = Some(header.clone());
        Ok(Some(header))
    }

    /// Decode the payload announced by the last header
    pub fn read_postings(&mut self) -> Result<PostingList> {
        let Some(header) = self.pending.take() else {
            return Err(InvFileError::InvalidInput(
                "no frame header pending".to_string(),
            ));
        };

        let mut payload = vec![0u8; header.payload_len as usize];
        self.read_exact(&mut payload, header.offset)?;
        codec::decode_postings(&payload, &self.layout)
    }

    /// Seek past the payload announced by the last header without decoding it
    pub fn skip_postings(&mut self) -> Result<()> {
        if let Some(header) = self.pending.take() {
            self.inner.seek_relative(header.payload_len as i64)?;
            self.pos += header.payload_len;
        }
        Ok(())
    }

    /// Decode the next complete frame
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        match self.next_header()? {
            Some(header) => {
                let postings = self.read_postings()?;
                Ok(Some(Frame {
                    term: header.term,
                    postings,
                    offset: header.offset,
                }))
            }
            None => Ok(None),
        }
    }

    /// Reposition at a frame boundary, typically an offset from a key scan
    pub fn seek_frame(&mut self, offset: ByteOffset) -> Result<()> {
        if offset > self.len {
            return Err(InvFileError::InvalidInput(format!(
                "offset {} is past the end of a {}-byte segment",
                offset, self.len
            )));
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        self.pending = None;
        Ok(())
    }

    fn ensure_remaining(&self, needed: u64, frame_offset: ByteOffset) -> Result<()> {
        if self.len - self.pos < needed {
            return Err(InvFileError::TruncatedFrame {
                offset: frame_offset,
            });
        }
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8], frame_offset: ByteOffset) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(InvFileError::TruncatedFrame {
                    offset: frame_offset,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read + Seek> Iterator for SegmentReader<R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
