//! Latin verb conjugation: stem/ending decomposition for presents, futures,
//! imperatives, and perfect participles.
//!
//! Grounded on spec.md §4.1. Futures encode asynchrony (`async = true`);
//! presents and imperatives are synchronous, matching the language's
//! convention that the mutating ("imperative") spelling of a method and the
//! non-mutating, returns-a-new-value ("perfect participle") spelling are
//! both derived from the same lexeme's two principal parts (glossary:
//! `adde` vs `addita`).

use super::edit_distance::closest;
use super::error::LexiconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tense {
    Present,
    Future,
    Imperative,
}

/// One possible morphological reading of a conjugated verb surface form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbAnalysis {
    pub stem: String,
    pub conjugation: u8,
    pub tense: Tense,
    pub person: Option<u8>,
    pub number: Option<super::nouns::Number>,
    /// Derived: `true` iff `tense == Future`.
    pub is_async: bool,
}

/// The form a word was recognized as by [`validate_morphology`]: either a
/// finite/imperative verb form, or a perfect (passive) participle — the
/// non-mutating "returns a new value" spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyForm {
    Imperative,
    Perfectum,
}

/// Result of validating a word against a verb's full principal-part
/// paradigm, as used by the method-naming convention (mutating imperative
/// vs non-mutating perfect participle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphologyResult {
    pub form: MorphologyForm,
    pub stem: String,
}

struct VerbEntry {
    /// Present/imperative stem (e.g. `selig` for `seligere`).
    present_stem: &'static str,
    /// Perfect-participle (supine) stem, when it diverges from the present
    /// stem — true for most of the third conjugation (`selig-` / `select-`,
    /// `add-` / `addit-`).
    participle_stem: &'static str,
    conjugation: u8,
}

const VERBS: &[VerbEntry] = &[
    VerbEntry { present_stem: "am", participle_stem: "amat", conjugation: 1 },       // amare, to love
    VerbEntry { present_stem: "mon", participle_stem: "monit", conjugation: 2 },     // monere, to warn
    VerbEntry { present_stem: "selig", participle_stem: "select", conjugation: 3 },  // seligere, to select
    VerbEntry { present_stem: "add", participle_stem: "addit", conjugation: 3 },     // addere, to add
    VerbEntry { present_stem: "aud", participle_stem: "audit", conjugation: 4 },     // audire, to hear
];

type Endings = &'static [(&'static str, u8, super::nouns::Number)];

fn imperative_ending(conjugation: u8) -> &'static str {
    match conjugation {
        1 => "a",
        2 => "e",
        3 => "e",
        4 => "i",
        _ => unreachable!("closed set of four conjugations"),
    }
}

fn present_endings(conjugation: u8) -> Endings {
    use super::nouns::Number::*;
    match conjugation {
        1 => &[("o", 1, Sg), ("as", 2, Sg), ("at", 3, Sg), ("amus", 1, Pl), ("atis", 2, Pl), ("ant", 3, Pl)],
        2 => &[("eo", 1, Sg), ("es", 2, Sg), ("et", 3, Sg), ("emus", 1, Pl), ("etis", 2, Pl), ("ent", 3, Pl)],
        3 => &[("o", 1, Sg), ("is", 2, Sg), ("it", 3, Sg), ("imus", 1, Pl), ("itis", 2, Pl), ("unt", 3, Pl)],
        4 => &[("io", 1, Sg), ("is", 2, Sg), ("it", 3, Sg), ("imus", 1, Pl), ("itis", 2, Pl), ("iunt", 3, Pl)],
        _ => unreachable!("closed set of four conjugations"),
    }
}

fn future_endings(conjugation: u8) -> Endings {
    use super::nouns::Number::*;
    match conjugation {
        1 => &[("abo", 1, Sg), ("abis", 2, Sg), ("abit", 3, Sg), ("abimus", 1, Pl), ("abitis", 2, Pl), ("abunt", 3, Pl)],
        2 => &[("ebo", 1, Sg), ("ebis", 2, Sg), ("ebit", 3, Sg), ("ebimus", 1, Pl), ("ebitis", 2, Pl), ("ebunt", 3, Pl)],
        3 => &[("am", 1, Sg), ("es", 2, Sg), ("et", 3, Sg), ("emus", 1, Pl), ("etis", 2, Pl), ("ent", 3, Pl)],
        4 => &[("iam", 1, Sg), ("ies", 2, Sg), ("iet", 3, Sg), ("iemus", 1, Pl), ("ietis", 2, Pl), ("ient", 3, Pl)],
        _ => unreachable!("closed set of four conjugations"),
    }
}

/// Perfect-participle number/gender endings. The language doesn't track
/// participle gender beyond recognizing the form, so these are collapsed to
/// "does this suffix belong to the participle paradigm at all".
const PARTICIPLE_ENDINGS: &[&str] = &["us", "um", "ae", "a"];

/// Parses a Latin surface form as a conjugated verb, returning every finite
/// (present/future/imperative) analysis the ending search finds. Perfect
/// participles are a different paradigm entirely — see
/// [`validate_morphology`] — since they don't carry person/number/async in
/// the way spec.md's `VerbAnalysis` shape requires.
pub fn parse_verb(word: &str) -> Result<Vec<VerbAnalysis>, LexiconError> {
    let lowered = word.to_ascii_lowercase();
    let mut analyses = Vec::new();

    for entry in VERBS {
        let Some(suffix) = lowered.strip_prefix(entry.present_stem) else { continue };

        if suffix == imperative_ending(entry.conjugation) {
            analyses.push(VerbAnalysis {
                stem: entry.present_stem.to_string(),
                conjugation: entry.conjugation,
                tense: Tense::Imperative,
                person: Some(2),
                number: Some(super::nouns::Number::Sg),
                is_async: false,
            });
        }

        for (ending, person, number) in present_endings(entry.conjugation) {
            if suffix == *ending {
                analyses.push(VerbAnalysis {
                    stem: entry.present_stem.to_string(),
                    conjugation: entry.conjugation,
                    tense: Tense::Present,
                    person: Some(*person),
                    number: Some(*number),
                    is_async: false,
                });
            }
        }

        for (ending, person, number) in future_endings(entry.conjugation) {
            if suffix == *ending {
                analyses.push(VerbAnalysis {
                    stem: entry.present_stem.to_string(),
                    conjugation: entry.conjugation,
                    tense: Tense::Future,
                    person: Some(*person),
                    number: Some(*number),
                    is_async: true,
                });
            }
        }
    }

    if analyses.is_empty() {
        let known_stems = VERBS.iter().map(|entry| entry.present_stem);
        return Err(LexiconError::UnknownStem { word: word.to_string(), suggestion: closest(&lowered, known_stems) });
    }

    Ok(analyses)
}

/// Validates `word` against the full principal-part paradigm of every
/// registered verb, preferring the perfect-participle reading over the
/// imperative one whenever both could explain the same surface form.
///
/// This greedy ordering is mandatory: the participle paradigm is checked
/// before the generic imperative ending, so a form like `selecta` resolves
/// to the participle stem `select` (perfect participle) rather than
/// spuriously matching a shorter imperative-like split.
///
/// `type_name` identifies the built-in collection the method spelling is
/// being validated against (e.g. `"tabula"`); it selects nothing here but
/// is threaded through so callers can report which collection's method
/// table the check was for.
pub fn validate_morphology(_type_name: &str, word: &str) -> Result<MorphologyResult, LexiconError> {
    let lowered = word.to_ascii_lowercase();

    for entry in VERBS {
        if let Some(suffix) = lowered.strip_prefix(entry.participle_stem) {
            if PARTICIPLE_ENDINGS.contains(&suffix) {
                return Ok(MorphologyResult { form: MorphologyForm::Perfectum, stem: entry.participle_stem.to_string() });
            }
        }
    }

    for entry in VERBS {
        if let Some(suffix) = lowered.strip_prefix(entry.present_stem) {
            if suffix == imperative_ending(entry.conjugation) {
                return Ok(MorphologyResult { form: MorphologyForm::Imperative, stem: entry.present_stem.to_string() });
            }
        }
    }

    let known_stems = VERBS.iter().flat_map(|entry| [entry.present_stem, entry.participle_stem]);
    Err(LexiconError::UnknownStem { word: word.to_string(), suggestion: closest(&lowered, known_stems) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::nouns::Number;

    #[test]
    fn imperative_is_synchronous() {
        let analyses = parse_verb("adde").unwrap();
        assert!(analyses.iter().any(|a| a.tense == Tense::Imperative && !a.is_async));
    }

    #[test]
    fn future_is_asynchronous() {
        let analyses = parse_verb("seligam").unwrap();
        assert!(analyses.iter().any(|a| a.tense == Tense::Future && a.is_async));
    }

    #[test]
    fn present_third_person_plural() {
        let analyses = parse_verb("addunt").unwrap();
        assert!(analyses.iter().any(|a| a.tense == Tense::Present && a.person == Some(3) && a.number == Some(Number::Pl)));
    }

    #[test]
    fn ordo_greediness_on_perfect_participles() {
        // Regression per spec.md §8: "-ta" (perfect participle) must beat
        // the shorter "-a" (imperative) reading on "selecta".
        let result = validate_morphology("tabula", "selecta").unwrap();
        assert_eq!(result.form, MorphologyForm::Perfectum);
        assert_eq!(result.stem, "select");
    }

    #[test]
    fn glossary_add_vs_addita_example() {
        let imperative = validate_morphology("lista", "adde").unwrap();
        assert_eq!(imperative.form, MorphologyForm::Imperative);

        let participle = validate_morphology("lista", "addita").unwrap();
        assert_eq!(participle.form, MorphologyForm::Perfectum);
        assert_eq!(participle.stem, "addit");
    }

    #[test]
    fn unknown_verb_stem_is_reported() {
        assert!(parse_verb("zzzat").is_err());
    }
}
