use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique 128-bit document identifier
///
/// Generated ids are UUIDv7, so ids created later in a process compare greater.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u128);

impl DocumentId {
    /// Generate a fresh time-ordered identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().as_u128())
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }

    pub fn as_uuid(self) -> Uuid {
        Uuid::from_u128(self.0)
    }
}

impl From<u128> for DocumentId {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value.as_u128())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_uuid())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_uuid().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from)
    }
}

/// One ingested unit of text, already tokenized
///
/// `length` always equals the number of tokens in `text`; `set_text` is the
/// only way to replace the tokens and it recomputes the length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRecord")]
pub struct Document {
    id: DocumentId,
    author: String,
    date: DateTime<Utc>,
    text: Vec<String>,
    length: usize,
    links: Vec<String>,
}

/// Wire shape for deserialization; `length` is derived, not trusted
#[derive(Deserialize)]
struct DocumentRecord {
    id: DocumentId,
    #[serde(default)]
    author: String,
    date: DateTime<Utc>,
    #[serde(default)]
    text: Vec<String>,
    #[serde(default)]
    links: Vec<String>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Document::with_id(record.id, record.text)
            .with_author(record.author)
            .with_date(record.date)
            .with_links(record.links)
    }
}

impl Document {
    /// Create a document with a freshly generated id, dated now
    pub fn new(text: Vec<String>) -> Self {
        Self::with_id(DocumentId::generate(), text)
    }

    /// Create a document with an id chosen by the caller
    pub fn with_id(id: impl Into<DocumentId>, text: Vec<String>) -> Self {
        let length = text.len();
        Self {
            id: id.into(),
            author: String::new(),
            date: Utc::now(),
            text,
            length,
            links: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Replace the token sequence and recompute the derived length
    pub fn set_text(&mut self, text: Vec<String>) {
        self.length = text.len();
        self.text = text;
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    pub fn add_link(&mut self, link: impl Into<String>) {
        self.links.push(link.into());
    }

    /// Number of occurrences of `term` in the token sequence
    pub fn term_frequency(&self, term: &str) -> usize {
        self.text.iter().filter(|token| token.as_str() == term).count()
    }
}
