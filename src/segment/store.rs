//! Save, load and scan operations over segment files

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use super::reader::SegmentReader;
use super::types::{ByteOffset, Frame, SegmentStats};
use super::writer::SegmentWriter;
use crate::config::FrameLayout;
use crate::error::{InvFileError, Result};
use crate::index::InvertedIndex;

/// Write every term of `index` to a new segment at `path`, in key order
///
/// An existing file at `path` is truncated.
pub fn save(index: &InvertedIndex, path: impl AsRef<Path>, layout: FrameLayout) -> Result<SegmentStats> {
    let path = path.as_ref();
    let mut writer = SegmentWriter::create(path, layout)?;
    for (term, postings) in index {
        writer.write_frame(term, postings)?;
    }
    let stats = writer.finish()?;

    info!(
        path = %path.display(),
        terms = stats.frames,
        postings = stats.postings,
        bytes = stats.bytes,
        "Saved segment"
    );
    Ok(stats)
}

/// Encode `index` exactly as `save` would write it, without touching disk
pub fn encode_index(index: &InvertedIndex, layout: FrameLayout) -> Result<Vec<u8>> {
    let mut writer = SegmentWriter::new(Vec::new(), layout)?;
    for (term, postings) in index {
        writer.write_frame(term, postings)?;
    }
    Ok(writer.into_inner()?.0)
}

/// Load a segment into a fresh index
///
/// With `keys = None` every frame is decoded. Otherwise only the posting lists
/// of terms in `keys` are decoded; the others are skipped by seeking over their
/// payload.
pub fn load(
    path: impl AsRef<Path>,
    keys: Option<&HashSet<String>>,
    layout: FrameLayout,
) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    load_into(&mut index, keys, path, layout)?;
    Ok(index)
}

/// Load selected posting lists into an existing index
///
/// Loaded terms replace whatever `index` already held for them.
pub fn load_into(
    index: &mut InvertedIndex,
    keys: Option<&HashSet<String>>,
    path: impl AsRef<Path>,
    layout: FrameLayout,
) -> Result<()> {
    let path = path.as_ref();
    let mut reader = SegmentReader::open(path, layout)?;
    let mut loaded = 0u64;
    let mut skipped = 0u64;

    while let Some(header) = reader.next_header()? {
        let wanted = keys.map_or(true, |keys| keys.contains(&header.term));
        if wanted {
            let postings = reader.read_postings()?;
            index.insert(header.term, postings);
            loaded += 1;
        } else {
            reader.skip_postings()?;
            skipped += 1;
        }
    }

    info!(path = %path.display(), loaded, skipped, "Loaded segment");
    Ok(())
}

/// List every term with the byte offset of its frame, never decoding payloads
pub fn scan_keys(path: impl AsRef<Path>, layout: FrameLayout) -> Result<Vec<(String, ByteOffset)>> {
    let mut reader = SegmentReader::open(path, layout)?;
    let mut keys = Vec::new();
    while let Some(header) = reader.next_header()? {
        keys.push((header.term, header.offset));
    }
    Ok(keys)
}

/// Decode the single frame starting at `offset`
pub fn read_frame_at(path: impl AsRef<Path>, offset: ByteOffset, layout: FrameLayout) -> Result<Frame> {
    let mut reader = SegmentReader::open(path, layout)?;
    reader.seek_frame(offset)?;
    reader.next_frame()?.ok_or_else(|| {
        InvFileError::InvalidInput(format!("no frame starts at offset {}", offset))
    })
}
