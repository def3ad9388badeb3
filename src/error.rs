//! Shared diagnostic envelope and report rendering.
//!
//! Every phase (lexicon, tokenizer, parser, semantic analyzer) defines its
//! own error enum tailored to the mistakes it can make, but all of them
//! reduce to the same flat [`ErrorEnvelope`] shape the external interface
//! promises (spec §6): `{code, text, help, position}`, with `code` a
//! greppable string prefixed `L`/`P`/`S` for lexical/parse/semantic. Tests
//! assert against `code`, never against `text`, since message wording is
//! free to evolve.
//!
//! Rendering rich, colored diagnostics is layered on top via
//! [`report_to_stderr`], grounded on `libtimu::error::CodeSpanReportGenerator`
//! (`codespan-reporting`'s `SimpleFiles` + `term::emit`). Nothing in the
//! core pipeline depends on rendering; an embedder that only wants the
//! structured envelopes never needs to call it.

use std::ops::Range;

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{self, termcolor::{ColorChoice, StandardStream}},
};

use crate::{file::SourceFile, position::Position};

/// A single diagnostic, flattened to the shape every external consumer
/// (code generators, IDE tooling, tests) actually needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Greppable, stable code, e.g. `L001`, `P014`, `S007`.
    pub code: &'static str,
    /// Human-readable message. Never asserted on in tests.
    pub text: String,
    /// A short actionable suggestion.
    pub help: String,
    /// Where in the source the problem starts.
    pub position: Position,
    /// Byte range for diagnostic rendering, when wider than a point.
    pub range: Range<usize>,
}

/// Implemented by every phase's error enum so [`report_to_stderr`] can work
/// uniformly over a mixed batch of lexical, syntactic and semantic errors.
pub trait IntoEnvelope {
    fn into_envelope(self) -> ErrorEnvelope;
}

/// Renders a batch of envelopes against their source file to a colored
/// terminal stream. Purely a convenience for embedders; the compiler proper
/// never calls this itself (see module docs).
pub fn report_to_stderr(file: &SourceFile, envelopes: &[ErrorEnvelope]) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(file.display_path(), file.source().to_string());

    let diagnostics: Vec<Diagnostic<usize>> = envelopes
        .iter()
        .map(|envelope| {
            Diagnostic::error()
                .with_code(envelope.code)
                .with_message(envelope.text.clone())
                .with_labels(vec![Label::primary(file_id, envelope.range.clone())])
                .with_notes(vec![envelope.help.clone()])
        })
        .collect();

    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = codespan_reporting::term::Config::default();
    for diagnostic in &diagnostics {
        let _ = term::emit(&mut writer.lock(), &config, &files, diagnostic);
    }
}
