use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InvFileError, Result};

/// Width of the key length prefix, in bytes
pub const KEY_LEN_WIDTH: usize = 1;

/// Width of a posting score, in bytes
pub const SCORE_WIDTH: usize = 4;

/// Width of the posting payload length, in bytes
pub const LIST_LEN_WIDTH: usize = 4;

/// Longest term (in UTF-8 bytes) the key length prefix can describe
pub const MAX_KEY_LEN: usize = (1 << (8 * KEY_LEN_WIDTH)) - 1;

/// Widest document id field a layout may declare
pub const MAX_ID_WIDTH: usize = 16;

/// Field widths shared by every writer and reader of a segment file.
///
/// Only the document id width is configurable. It is not recorded in the file,
/// so segments written with different widths cannot be read with each other's
/// layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLayout {
    pub id_width: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            id_width: MAX_ID_WIDTH,
        }
    }
}

impl FrameLayout {
    pub fn new(id_width: usize) -> Result<Self> {
        let layout = Self { id_width };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_width == 0 || self.id_width > MAX_ID_WIDTH {
            return Err(InvFileError::InvalidLayout(format!(
                "id_width must be within 1..={}, got {}",
                MAX_ID_WIDTH, self.id_width
            )));
        }
        Ok(())
    }

    /// Size of one encoded `(doc_id, score)` entry
    pub fn entry_size(&self) -> usize {
        self.id_width + SCORE_WIDTH
    }
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 1,
            max_token_length: 50,
        }
    }
}

/// Settings shared by index builds, loads and merges
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IndexSettings {
    #[serde(default)]
    pub layout: FrameLayout,
    #[serde(default)]
    pub tokenizer_config: TokenizerConfig,
}

impl IndexSettings {
    /// Read settings from a JSON file; missing sections fall back to defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: IndexSettings = serde_json::from_str(&raw)?;
        settings.layout.validate()?;
        Ok(settings)
    }

    pub fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_tokenizer_config(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer_config = config;
        self
    }
}
