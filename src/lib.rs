//! Persistent inverted index stored as sorted, length-prefixed segment files
//!
//! Documents are indexed in memory into term → posting list maps, written to
//! disk as a sequence of big-endian frames, reloaded whole or by selected
//! terms, and combined with a streaming merge that never loads a whole
//! segment.

pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod segment;
pub mod tokenizer;

pub use config::{FrameLayout, IndexSettings, TokenizerConfig};
pub use error::{InvFileError, Result};
pub use index::{build_index, IndexBuilder, InvertedIndex, Scorer};
pub use models::*;
pub use segment::{
    encode_index, load, load_into, merge, merge_all, read_frame_at, save, scan_keys, MergeStats,
    SegmentStats, TermDictionary,
};
pub use tokenizer::{Tokenize, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
