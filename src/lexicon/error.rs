//! The lexicon's own error record, shared by noun and verb recognition.
//!
//! Spec.md §4.1: `{kind: unknownStem | invalidEnding, word, stem?, ending?,
//! suggestion?}`. Modeled as an enum rather than a single struct with
//! optional fields, since `stem`/`ending` only ever co-occur on the
//! `invalidEnding` branch and `suggestion` only on `unknownStem` — a closed
//! sum makes the impossible combinations unrepresentable.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexiconError {
    #[error("unknown stem in '{word}'")]
    UnknownStem { word: String, suggestion: Option<String> },
    #[error("'{ending}' is not a valid ending for stem '{stem}'")]
    InvalidEnding { word: String, stem: String, ending: String },
}

impl LexiconError {
    pub fn word(&self) -> &str {
        match self {
            LexiconError::UnknownStem { word, .. } => word,
            LexiconError::InvalidEnding { word, .. } => word,
        }
    }
}
