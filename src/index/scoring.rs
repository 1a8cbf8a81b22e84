//! Scoring functions for `(term, document)` pairs
//!
//! A scorer turns a term and the document it occurs in into the integer
//! weight stored next to the document id in a posting. Any
//! `Fn(&str, &Document) -> Score` closure is a scorer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvFileError;
use crate::models::{Document, Score};

/// Computes the weight of `term` in `document`
pub trait Scorer {
    fn score(&self, term: &str, document: &Document) -> Score;
}

impl<F> Scorer for F
where
    F: Fn(&str, &Document) -> Score,
{
    fn score(&self, term: &str, document: &Document) -> Score {
        self(term, document)
    }
}

/// Number of characters in the term, ignoring the document
#[derive(Clone, Copy, Debug, Default)]
pub struct TermLength;

impl Scorer for TermLength {
    fn score(&self, term: &str, _document: &Document) -> Score {
        term.chars().count() as Score
    }
}

/// Raw count of the term in the document
#[derive(Clone, Copy, Debug, Default)]
pub struct TermFrequency;

impl Scorer for TermFrequency {
    fn score(&self, term: &str, document: &Document) -> Score {
        document.term_frequency(term) as Score
    }
}

/// Term frequency divided by document length, scaled to an integer
///
/// `scale` sets the resolution: a term making up the whole document scores
/// exactly `scale`.
#[derive(Clone, Copy, Debug)]
pub struct NormalizedFrequency {
    pub scale: Score,
}

impl Default for NormalizedFrequency {
    fn default() -> Self {
        Self { scale: 1000 }
    }
}

impl Scorer for NormalizedFrequency {
    fn score(&self, term: &str, document: &Document) -> Score {
        let length = document.length() as Score;
        if length == 0 {
            return 0;
        }
        (document.term_frequency(term) as Score).saturating_mul(self.scale) / length
    }
}

/// Built-in scorers, selectable by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinScorer {
    #[default]
    Length,
    Tf,
    Normalized,
}

impl Scorer for BuiltinScorer {
    fn score(&self, term: &str, document: &Document) -> Score {
        match self {
            BuiltinScorer::Length => TermLength.score(term, document),
            BuiltinScorer::Tf => TermFrequency.score(term, document),
            BuiltinScorer::Normalized => NormalizedFrequency::default().score(term, document),
        }
    }
}

impl FromStr for BuiltinScorer {
    type Err = InvFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" => Ok(BuiltinScorer::Length),
            "tf" => Ok(BuiltinScorer::Tf),
            "normalized" => Ok(BuiltinScorer::Normalized),
            other => Err(InvFileError::InvalidInput(format!(
                "unknown scorer '{}', expected length, tf or normalized",
                other
            ))),
        }
    }
}

impl fmt::Display for BuiltinScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuiltinScorer::Length => "length",
            BuiltinScorer::Tf => "tf",
            BuiltinScorer::Normalized => "normalized",
        };
        f.write_str(name)
    }
}
