//! Tokenization capability and the default Unicode tokenizer

mod text;

pub use text::Tokenizer;

/// Splits raw text into the ordered token sequence of a document
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}
