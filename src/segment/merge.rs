//! Streaming merge of sorted segment files
//!
//! Two-way merge holds one decoded frame per input and writes the smaller term
//! first. When both inputs carry the same term, the output posting list is the
//! first input's entries followed by the second's: no interleaving, no
//! deduplication. Memory use is bounded by the two current frames.
//!
//! Merging more than two segments is done by repeated pairwise merges through
//! intermediate files.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::reader::SegmentReader;
use super::types::{Frame, SegmentStats};
use super::writer::SegmentWriter;
use crate::config::FrameLayout;
use crate::error::{InvFileError, Result};

/// Counters reported by a two-way merge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Frames read from the first input
    pub frames_a: u64,
    /// Frames read from the second input
    pub frames_b: u64,
    /// Terms present in both inputs
    pub shared_terms: u64,
    /// What was written to the output
    pub output: SegmentStats,
}

/// Merge two sorted segments into a new segment at `output`
///
/// Neither input is modified. `output` must not name either input.
pub fn merge(
    output: impl AsRef<Path>,
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
    layout: FrameLayout,
) -> Result<MergeStats> {
    let (output, path_a, path_b) = (output.as_ref(), path_a.as_ref(), path_b.as_ref());
    for input in [path_a, path_b] {
        if same_file(output, input) {
            return Err(InvFileError::InvalidInput(format!(
                "merge output {} would overwrite its input",
                output.display()
            )));
        }
    }

    let mut a = SegmentReader::open(path_a, layout)?;
    let mut b = SegmentReader::open(path_b, layout)?;
    for (path, reader) in [(path_a, &a), (path_b, &b)] {
        if reader.is_empty() {
            warn!(path = %path.display(), "Merging an empty segment");
        }
    }

    let mut writer = SegmentWriter::create(output, layout)?;
    let mut stats = MergeStats::default();

    let mut head_a = a.next_frame()?;
    let mut head_b = b.next_frame()?;

    loop {
        match (head_a.take(), head_b.take()) {
            (None, None) => break,
            (Some(frame), None) => {
                writer.write_frame(&frame.term, &frame.postings)?;
                stats.frames_a += 1;
                head_a = a.next_frame()?;
            }
            (None, Some(frame)) => {
                writer.write_frame(&frame.term, &frame.postings)?;
                stats.frames_b += 1;
                head_b = b.next_frame()?;
            }
            (Some(frame_a), Some(frame_b)) => match frame_a.term.cmp(&frame_b.term) {
                Ordering::Less => {
                    writer.write_frame(&frame_a.term, &frame_a.postings)?;
                    stats.frames_a += 1;
                    head_a = a.next_frame()?;
                    head_b = Some(frame_b);
                }
                Ordering::Greater => {
                    writer.write_frame(&frame_b.term, &frame_b.postings)?;
                    stats.frames_b += 1;
                    head_a = Some(frame_a);
                    head_b = b.next_frame()?;
                }
                Ordering::Equal => {
                    let Frame {
                        term, mut postings, ..
                    } = frame_a;
                    postings.concat(frame_b.postings);
                    writer.write_frame(&term, &postings)?;
                    stats.frames_a += 1;
                    stats.frames_b += 1;
                    stats.shared_terms += 1;
                    head_a = a.next_frame()?;
                    head_b = b.next_frame()?;
                }
            },
        }
    }

    stats.output = writer.finish()?;
    info!(
        output = %output.display(),
        a = %path_a.display(),
        b = %path_b.display(),
        frames_a = stats.frames_a,
        frames_b = stats.frames_b,
        shared_terms = stats.shared_terms,
        bytes = stats.output.bytes,
        "Merged segments"
    );
    Ok(stats)
}

/// Merge any number of segments by folding pairwise merges left to right
///
/// Posting lists of a shared term keep input order: entries from `inputs[0]`
/// come first. Intermediate files live next to `output` and are removed when
/// the merge finishes, whether or not it succeeded. `output` must not name any
/// of the inputs.
pub fn merge_all<P: AsRef<Path>>(
    output: impl AsRef<Path>,
    inputs: &[P],
    layout: FrameLayout,
) -> Result<SegmentStats> {
    let output = output.as_ref();
    let (first, rest) = match inputs {
        [first, rest @ ..] if !rest.is_empty() => (first.as_ref(), rest),
        _ => {
            return Err(InvFileError::InvalidInput(format!(
                "merge needs at least two segments, got {}",
                inputs.len()
            )))
        }
    };

    let inputs: Vec<&Path> = inputs.iter().map(AsRef::as_ref).collect();
    if let Some(input) = inputs.iter().find(|input| same_file(output, input)) {
        return Err(InvFileError::InvalidInput(format!(
            "merge output {} would overwrite its input {}",
            output.display(),
            input.display()
        )));
    }

    let mut intermediates = Intermediates::default();
    let mut current = first.to_path_buf();
    let mut stats = SegmentStats::default();

    for (step, next) in rest.iter().enumerate() {
        let target = if step + 1 == rest.len() {
            output.to_path_buf()
        } else {
            intermediates.next_path(output, step, &inputs)
        };
        stats = merge(&target, &current, next, layout)?.output;
        debug!(step, target = %target.display(), terms = stats.frames, "Pairwise merge step done");
        current = target;
    }

    Ok(stats)
}

/// Intermediate files of a multi-way merge, removed on drop
#[derive(Default)]
struct Intermediates(Vec<PathBuf>);

impl Intermediates {
    /// Pick a sibling of `output` that is neither an input nor an existing file
    fn next_path(&mut self, output: &Path, step: usize, inputs: &[&Path]) -> PathBuf {
        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "segment".to_string());

        let mut attempt = 0usize;
        let path = loop {
            let candidate = match attempt {
                0 => output.with_file_name(format!("{}.merge-{}.tmp", name, step)),
                n => output.with_file_name(format!("{}.merge-{}-{}.tmp", name, step, n)),
            };
            let taken = candidate.exists() || inputs.iter().any(|input| same_file(&candidate, input));
            if !taken {
                break candidate;
            }
            attempt += 1;
        };

        self.0.push(path.clone());
        path
    }
}

impl Drop for Intermediates {
    fn drop(&mut self) {
        for path in &self.0 {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to remove intermediate segment");
                }
            }
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
