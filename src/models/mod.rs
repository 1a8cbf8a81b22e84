pub mod document;
pub mod message;
pub mod posting;

pub use document::{Document, DocumentId};
pub use message::{Corpus, Embed, Message};
pub use posting::{PostingEntry, PostingList, Score};
