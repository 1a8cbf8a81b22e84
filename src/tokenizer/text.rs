use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::Tokenize;
use crate::config::TokenizerConfig;

/// Splits message text into document tokens
///
/// Words come from Unicode word segmentation, so lone punctuation never
/// becomes a token. Length limits and stop-words apply to the normalised word,
/// stemming runs last.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    pub fn new(config: &TokenizerConfig) -> Self {
        let stopwords: HashSet<String> = if config.remove_stopwords {
            get(LANGUAGE::English).iter().map(|w| w.to_lowercase()).collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer: config.stem.then(|| Stemmer::create(Algorithm::English)),
            stopwords,
        }
    }

    /// Ordered token sequence of `text`, repeats included
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .filter_map(|word| self.normalize(word))
            .collect()
    }

    fn normalize(&self, word: &str) -> Option<String> {
        let word = if self.config.lowercase {
            word.to_lowercase()
        } else {
            word.to_string()
        };

        let len = word.len();
        if len < self.config.min_token_length
            || len > self.config.max_token_length
            || self.stopwords.contains(&word)
        {
            return None;
        }

        Some(match &self.stemmer {
            Some(stemmer) => stemmer.stem(&word).into_owned(),
            None => word,
        })
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

impl Tokenize for Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        Tokenizer::tokenize(self, text)
    }
}
