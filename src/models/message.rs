//! Ingestion adapter: raw chat messages to tokenized documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Document;
use crate::error::Result;
use crate::tokenizer::Tokenize;

/// Attachment or embed carried by a message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub url: String,
}

/// A raw message as retrieved from the chat platform
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

/// An ordered collection of documents ready to be indexed
///
/// Serializes as `{"document": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(rename = "document")]
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize each message into a document with a fresh id
    pub fn from_messages<T: Tokenize + ?Sized>(messages: &[Message], tokenizer: &T) -> Self {
        let documents = messages
            .iter()
            .map(|message| {
                let mut doc = Document::new(tokenizer.tokenize(&message.content))
                    .with_author(message.author.clone())
                    .with_date(message.timestamp);
                for embed in &message.embeds {
                    doc.add_link(embed.url.clone());
                }
                doc
            })
            .collect();
        Self { documents }
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Documents of `self` followed by those of `other`
    pub fn concat(mut self, other: Corpus) -> Self {
        self.documents.extend(other.documents);
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
