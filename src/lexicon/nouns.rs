//! Latin noun declension: stem/ending decomposition with syncretism.
//!
//! Grounded on spec.md §4.1: a static declension-ending table per
//! declension class, greedy against a small dictionary of registered noun
//! stems. A single ending can legitimately map to more than one
//! `(case, number)` pair — Latin syncretism — in which case [`parse_noun`]
//! returns every analysis rather than picking one; callers (the parser's
//! identifier classifier, the semantic analyzer) decide by context.

use super::edit_distance::closest;
pub use super::error::LexiconError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Masc,
    Fem,
    Neut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    Nom,
    Acc,
    Gen,
    Dat,
    Abl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    Sg,
    Pl,
}

/// One possible morphological reading of a declined noun surface form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounAnalysis {
    pub stem: String,
    pub declension: u8,
    pub gender: Gender,
    pub case: Case,
    pub number: Number,
}

struct NounEntry {
    stem: &'static str,
    declension: u8,
    gender: Gender,
    /// Explicit nominative singular, for third-declension nouns whose
    /// nominative diverges from the stem (`tempor-` / nominative `tempus`).
    nominative: Option<&'static str>,
}

const NOUNS: &[NounEntry] = &[
    // 1st declension, feminine
    NounEntry { stem: "puell", declension: 1, gender: Gender::Fem, nominative: None }, // puella, girl
    NounEntry { stem: "litter", declension: 1, gender: Gender::Fem, nominative: None }, // littera, letter
    NounEntry { stem: "form", declension: 1, gender: Gender::Fem, nominative: None },   // forma, shape
    // 2nd declension, masculine
    NounEntry { stem: "domin", declension: 2, gender: Gender::Masc, nominative: None }, // dominus, master
    NounEntry { stem: "serv", declension: 2, gender: Gender::Masc, nominative: None },  // servus, servant
    NounEntry { stem: "popul", declension: 2, gender: Gender::Masc, nominative: None }, // populus, people
    // 2nd declension, neuter
    NounEntry { stem: "verb", declension: 2, gender: Gender::Neut, nominative: None }, // verbum, word
    NounEntry { stem: "don", declension: 2, gender: Gender::Neut, nominative: None },  // donum, gift
    // 3rd declension, masculine
    NounEntry { stem: "sermon", declension: 3, gender: Gender::Masc, nominative: Some("sermo") }, // speech
    // 3rd declension, feminine
    NounEntry { stem: "part", declension: 3, gender: Gender::Fem, nominative: Some("pars") }, // part
    NounEntry { stem: "ment", declension: 3, gender: Gender::Fem, nominative: Some("mens") }, // mind
    // 3rd declension, neuter (nominative diverges from the stem)
    NounEntry { stem: "nomin", declension: 3, gender: Gender::Neut, nominative: Some("nomen") }, // name
    NounEntry { stem: "tempor", declension: 3, gender: Gender::Neut, nominative: Some("tempus") }, // time
    NounEntry { stem: "corpor", declension: 3, gender: Gender::Neut, nominative: Some("corpus") }, // body
    // 4th declension, masculine
    NounEntry { stem: "fruct", declension: 4, gender: Gender::Masc, nominative: None }, // fructus, fruit
    NounEntry { stem: "curs", declension: 4, gender: Gender::Masc, nominative: None },  // cursus, course
    // 5th declension, feminine
    NounEntry { stem: "speci", declension: 5, gender: Gender::Fem, nominative: None }, // species, kind
    NounEntry { stem: "faci", declension: 5, gender: Gender::Fem, nominative: None },  // facies, appearance
];

/// Ending tables, longest suffix first so greedy matching never picks a
/// shorter ending when a longer one also fits (matters once stems share a
/// tail, as nouns and verbs both can).
fn endings_for(declension: u8, gender: Gender) -> &'static [(&'static str, &'static [(Case, Number)])] {
    use Case::*;
    use Number::*;
    match (declension, gender) {
        (1, _) => &[
            ("arum", &[(Gen, Pl)]),
            ("ae", &[(Gen, Sg), (Dat, Sg), (Nom, Pl)]), // the spec's canonical syncretism example
            ("am", &[(Acc, Sg)]),
            ("as", &[(Acc, Pl)]),
            ("is", &[(Dat, Pl), (Abl, Pl)]),
            ("a", &[(Nom, Sg), (Abl, Sg)]),
        ],
        (2, Gender::Neut) => &[
            ("orum", &[(Gen, Pl)]),
            ("is", &[(Dat, Pl), (Abl, Pl)]),
            ("um", &[(Nom, Sg), (Acc, Sg)]),
            ("i", &[(Gen, Sg)]),
            ("o", &[(Dat, Sg), (Abl, Sg)]),
            ("a", &[(Nom, Pl), (Acc, Pl)]),
        ],
        (2, _) => &[
            ("orum", &[(Gen, Pl)]),
            ("is", &[(Dat, Pl), (Abl, Pl)]),
            ("us", &[(Nom, Sg)]),
            ("um", &[(Acc, Sg)]),
            ("os", &[(Acc, Pl)]),
            ("i", &[(Gen, Sg), (Nom, Pl)]), // the spec's other canonical syncretism example
            ("o", &[(Dat, Sg), (Abl, Sg)]),
        ],
        (3, Gender::Neut) => &[
            ("ibus", &[(Dat, Pl), (Abl, Pl)]),
            ("is", &[(Gen, Sg)]),
            ("um", &[(Gen, Pl)]),
            ("i", &[(Dat, Sg)]),
            ("e", &[(Abl, Sg)]),
            ("a", &[(Nom, Pl), (Acc, Pl)]),
        ],
        (3, _) => &[
            ("ibus", &[(Dat, Pl), (Abl, Pl)]),
            ("um", &[(Gen, Pl)]),
            ("is", &[(Gen, Sg)]),
            ("em", &[(Acc, Sg)]),
            ("es", &[(Nom, Pl), (Acc, Pl)]),
            ("i", &[(Dat, Sg)]),
            ("e", &[(Abl, Sg)]),
        ],
        (4, _) => &[
            ("ibus", &[(Dat, Pl), (Abl, Pl)]),
            ("uum", &[(Gen, Pl)]),
            ("ui", &[(Dat, Sg)]),
            ("um", &[(Acc, Sg)]),
            ("us", &[(Nom, Sg), (Gen, Sg)]),
            ("u", &[(Abl, Sg)]),
        ],
        (5, _) => &[
            ("ebus", &[(Dat, Pl), (Abl, Pl)]),
            ("erum", &[(Gen, Pl)]),
            ("es", &[(Nom, Sg), (Nom, Pl), (Acc, Pl)]),
            ("ei", &[(Gen, Sg), (Dat, Sg)]),
            ("em", &[(Acc, Sg)]),
            ("e", &[(Abl, Sg)]),
        ],
        _ => &[],
    }
}

/// Parses a Latin surface form as a declined noun, returning every analysis
/// syncretism admits.
pub fn parse_noun(word: &str) -> Result<Vec<NounAnalysis>, LexiconError> {
    let lowered = word.to_ascii_lowercase();

    for entry in NOUNS {
        if Some(lowered.as_str()) == entry.nominative {
            return Ok(vec![NounAnalysis {
                stem: entry.stem.to_string(),
                declension: entry.declension,
                gender: entry.gender,
                case: Case::Nom,
                number: Number::Sg,
            }]);
        }

        let Some(suffix) = lowered.strip_prefix(entry.stem) else { continue };
        let table = endings_for(entry.declension, entry.gender);

        // longest-match first: `table` is already ordered longest-ending-first
        for (ending, analyses) in table {
            if suffix == *ending {
                return Ok(analyses
                    .iter()
                    .map(|(case, number)| NounAnalysis {
                        stem: entry.stem.to_string(),
                        declension: entry.declension,
                        gender: entry.gender,
                        case: *case,
                        number: *number,
                    })
                    .collect());
            }
        }

        // Stem recognized but no ending in the paradigm covers this suffix.
        return Err(LexiconError::InvalidEnding {
            word: word.to_string(),
            stem: entry.stem.to_string(),
            ending: suffix.to_string(),
        });
    }

    let known_stems = NOUNS.iter().map(|entry| entry.stem);
    Err(LexiconError::UnknownStem {
        word: word.to_string(),
        suggestion: closest(&lowered, known_stems),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("puella", Case::Nom, Number::Sg)]
    #[case("puellam", Case::Acc, Number::Sg)]
    #[case("puellarum", Case::Gen, Number::Pl)]
    fn recognizes_first_declension_endings(#[case] word: &str, #[case] case: Case, #[case] number: Number) {
        let analyses = parse_noun(word).unwrap();
        assert!(analyses.iter().any(|a| a.case == case && a.number == number));
    }

    #[test]
    fn ae_ending_is_genuinely_ambiguous() {
        let analyses = parse_noun("puellae").unwrap();
        assert!(analyses.contains(&NounAnalysis { stem: "puell".into(), declension: 1, gender: Gender::Fem, case: Case::Gen, number: Number::Sg }));
        assert!(analyses.contains(&NounAnalysis { stem: "puell".into(), declension: 1, gender: Gender::Fem, case: Case::Dat, number: Number::Sg }));
        assert!(analyses.contains(&NounAnalysis { stem: "puell".into(), declension: 1, gender: Gender::Fem, case: Case::Nom, number: Number::Pl }));
    }

    #[test]
    fn second_declension_i_ending_is_genuinely_ambiguous() {
        let analyses = parse_noun("domini").unwrap();
        assert!(analyses.contains(&NounAnalysis { stem: "domin".into(), declension: 2, gender: Gender::Masc, case: Case::Gen, number: Number::Sg }));
        assert!(analyses.contains(&NounAnalysis { stem: "domin".into(), declension: 2, gender: Gender::Masc, case: Case::Nom, number: Number::Pl }));
    }

    #[test]
    fn third_declension_nominative_diverges_from_stem() {
        let analyses = parse_noun("tempus").unwrap();
        assert_eq!(analyses, vec![NounAnalysis { stem: "tempor".into(), declension: 3, gender: Gender::Neut, case: Case::Nom, number: Number::Sg }]);
    }

    #[test]
    fn fifth_declension_es_ending_covers_three_readings() {
        let analyses = parse_noun("species").unwrap();
        assert!(analyses.contains(&NounAnalysis { stem: "speci".into(), declension: 5, gender: Gender::Fem, case: Case::Nom, number: Number::Sg }));
        assert!(analyses.contains(&NounAnalysis { stem: "speci".into(), declension: 5, gender: Gender::Fem, case: Case::Nom, number: Number::Pl }));
        assert!(analyses.contains(&NounAnalysis { stem: "speci".into(), declension: 5, gender: Gender::Fem, case: Case::Acc, number: Number::Pl }));
    }

    #[test]
    fn fifth_declension_genitive_singular() {
        let analyses = parse_noun("faciei").unwrap();
        assert!(analyses.iter().any(|a| a.stem == "faci" && a.declension == 5 && a.case == Case::Gen && a.number == Number::Sg));
    }

    #[test]
    fn unknown_stem_suggests_a_close_match() {
        let error = parse_noun("puela").unwrap_err();
        match error {
            LexiconError::UnknownStem { suggestion, .. } => assert_eq!(suggestion.as_deref(), Some("puell")),
            other => panic!("expected UnknownStem, got {other:?}"),
        }
    }

    #[test]
    fn known_stem_with_unparadigmed_ending_is_reported() {
        let error = parse_noun("puellxyz").unwrap_err();
        assert!(matches!(error, LexiconError::InvalidEnding { .. }));
    }
}
