//! Faber Romanus: a compiler frontend for a Latin-surface programming
//! language, through the three pipeline stages this crate owns — tokenize,
//! parse, analyze. Per-target code generation, the CLI, and the test
//! runner are out of scope here; this crate stops at a type-checked AST.
//!
//! The teacher (`libtimu`) is a binary crate with no `lib.rs` of its own —
//! its `main.rs` wires `nom_parser::parse` straight into a one-shot
//! diagnostic printer. This crate is a library instead, so each stage is
//! exposed as a plain function operating on the previous stage's output:
//!
//! ```ignore
//! let file = SourceFile::new(path, source);
//! let (tokens, lex_errors) = tokenize(&file);
//! let (program, parse_errors) = parse(&tokens);
//! if let Some(program) = program {
//!     let (program, semantic_errors) = analyze(program, AnalysisOptions { file_path: Some(path) });
//! }
//! ```
//!
//! None of the three stages panics or throws on malformed input; each
//! collects its own error list alongside whatever partial result it could
//! still produce, per spec.md's non-throwing pipeline requirement.

pub mod ast;
pub mod error;
pub mod file;
pub mod lexicon;
pub mod nom_tools;
pub mod parser;
pub mod position;
pub mod semantic;
pub mod token;
pub mod tokenizer;

pub use ast::Program;
pub use error::{report_to_stderr, ErrorEnvelope, IntoEnvelope};
pub use file::SourceFile;
pub use position::Position;

pub use tokenizer::{tokenize, LexError};

pub use parser::{parse, ParseError};

pub use semantic::{analyze, AnalysisOptions, SemanticError};

pub use lexicon::{
    get_keyword, is_builtin_type, is_keyword, parse_noun, parse_type, parse_verb,
    validate_morphology, BuiltinType, Case, Gender, Keyword, MorphologyForm, MorphologyResult,
    NounAnalysis, Number, Tense, TypeCategory, VerbAnalysis,
};
