//! The morphological lexicon: Latin inflection recognition plus the
//! keyword and built-in-type tables that sit alongside it.
//!
//! This is the leaf of the pipeline (spec.md §2): nothing here depends on
//! the tokenizer, parser, or semantic analyzer, and everything in this
//! module is synchronous and pure, matching the external interface's
//! promise (spec.md §6.5) that `parseNoun`, `parseVerb`, `parseType`,
//! `isKeyword`, `getKeyword`, and `isBuiltinType` never fail to terminate
//! and never touch I/O.

pub mod edit_distance;
pub mod error;
pub mod keywords;
pub mod nouns;
pub mod types;
pub mod verbs;

pub use error::LexiconError;
pub use keywords::{get_keyword, is_keyword, Keyword};
pub use nouns::{parse_noun, Case, Gender, Number, NounAnalysis};
pub use types::{is_builtin_type, parse_type, BuiltinType, TypeCategory};
pub use verbs::{parse_verb, validate_morphology, MorphologyForm, MorphologyResult, Tense, VerbAnalysis};
