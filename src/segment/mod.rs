//! Segment files: the on-disk form of an inverted index
//!
//! A segment is a flat sequence of frames, one per term, in strictly ascending
//! term order. There is no header, footer or checksum.
//!
//! # Architecture
//!
//! - `codec`: big-endian fixed-width frame encoding
//! - `SegmentWriter`: sequential frame writer that enforces term order
//! - `SegmentReader`: streaming reader that can skip payloads by length
//! - `store`: whole-file save, load and key scan
//! - `merge`: streaming two-way and multi-way merge
//! - `TermDictionary`: FST map from term to frame offset

pub mod codec;
mod merge;
mod reader;
mod store;
mod term_dict;
mod types;
mod writer;

pub use merge::*;
pub use reader::*;
pub use store::*;
pub use term_dict::*;
pub use types::*;
pub use writer::*;
