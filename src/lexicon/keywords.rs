//! The closed set of reserved Latin keywords.
//!
//! Classical Latin carries no case distinction, so keyword recognition is
//! case-insensitive end to end: the canonical spelling stored on a
//! [`Keyword`] and returned by [`get_keyword`] is always lowercase,
//! regardless of how the source spelled it (`Si`, `SI`, `si` all resolve to
//! [`Keyword::Si`]). This mirrors the teacher's case-insensitive map
//! convention (§9 design notes: "pre-lowercase the key on insertion and on
//! lookup; keep the canonical display form in the entry").

use strum_macros::{EnumIter, IntoStaticStr};

/// One reserved word in the Faber Romanus surface grammar.
///
/// Variant groupings follow spec.md §4.3 exactly: conditional branch
/// families, the return-arrow verb family, pattern-match introducers,
/// exception handling, scoped resources, and test constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Keyword {
    // Variable declarations
    Varia,
    Fixum,
    // Function declarations / return-arrow family
    Fit,
    Fiet,
    Fiunt,
    Fient,
    Futura,
    Cursor,
    Prae,
    Typus,
    // Conditionals: two interchangeable branch-keyword families
    Si,
    Aliter,
    Secus,
    Sin,
    Ergo,
    /// The ternary-expression marker (spec.md §4.3's precedence ladder names
    /// it literally: "conditional (`sic`/`secus` ternary)"), distinct from
    /// the statement-level `si` condition introducer.
    Sic,
    // Iteration
    Dum,
    Ex,
    Pro,
    De,
    In,
    // Pattern matching
    Discerne,
    Casu,
    Ut,
    Elige,
    // Exceptions
    Tempta,
    Cape,
    Demum,
    Iace,
    Mori,
    // Scoped resources / test fixtures
    Cura,
    Cede,
    Ante,
    Post,
    Omnia,
    // Tests
    Probandum,
    Proba,
    // Declarations
    Genus,
    Pactum,
    Ordo,
    Discretio,
    Importa,
    // Expressions
    Usque,
    Qua,
    Novum,
    Finge,
    Non,
    Nulla,
    Nonnulla,
    Et,
    Aut,
    // Literals
    Verum,
    Falsum,
    Nihil,
    Vacuum,
    // Control-transfer statements and intrinsics not otherwise named by a
    // surface construct in spec.md §4.3's highlights; Latin spellings
    // chosen to match the register of the rest of the keyword set.
    Redde,
    Rumpe,
    Perge,
    Scribe,
    Affirma,
}

impl Keyword {
    /// The canonical, always-lowercase spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Varia => "varia",
            Keyword::Fixum => "fixum",
            Keyword::Fit => "fit",
            Keyword::Fiet => "fiet",
            Keyword::Fiunt => "fiunt",
            Keyword::Fient => "fient",
            Keyword::Futura => "futura",
            Keyword::Cursor => "cursor",
            Keyword::Prae => "prae",
            Keyword::Typus => "typus",
            Keyword::Si => "si",
            Keyword::Aliter => "aliter",
            Keyword::Secus => "secus",
            Keyword::Sin => "sin",
            Keyword::Ergo => "ergo",
            Keyword::Sic => "sic",
            Keyword::Dum => "dum",
            Keyword::Ex => "ex",
            Keyword::Pro => "pro",
            Keyword::De => "de",
            Keyword::In => "in",
            Keyword::Discerne => "discerne",
            Keyword::Casu => "casu",
            Keyword::Ut => "ut",
            Keyword::Elige => "elige",
            Keyword::Tempta => "tempta",
            Keyword::Cape => "cape",
            Keyword::Demum => "demum",
            Keyword::Iace => "iace",
            Keyword::Mori => "mori",
            Keyword::Cura => "cura",
            Keyword::Cede => "cede",
            Keyword::Ante => "ante",
            Keyword::Post => "post",
            Keyword::Omnia => "omnia",
            Keyword::Probandum => "probandum",
            Keyword::Proba => "proba",
            Keyword::Genus => "genus",
            Keyword::Pactum => "pactum",
            Keyword::Ordo => "ordo",
            Keyword::Discretio => "discretio",
            Keyword::Importa => "importa",
            Keyword::Usque => "usque",
            Keyword::Qua => "qua",
            Keyword::Novum => "novum",
            Keyword::Finge => "finge",
            Keyword::Non => "non",
            Keyword::Nulla => "nulla",
            Keyword::Nonnulla => "nonnulla",
            Keyword::Et => "et",
            Keyword::Aut => "aut",
            Keyword::Verum => "verum",
            Keyword::Falsum => "falsum",
            Keyword::Nihil => "nihil",
            Keyword::Vacuum => "vacuum",
            Keyword::Redde => "redde",
            Keyword::Rumpe => "rumpe",
            Keyword::Perge => "perge",
            Keyword::Scribe => "scribe",
            Keyword::Affirma => "affirma",
        }
    }

    /// Whether this verb-form keyword marks a function as async
    /// (`fiet`/`fient`, the future-tense forms).
    pub fn is_async_marker(self) -> bool {
        matches!(self, Keyword::Fiet | Keyword::Fient)
    }

    /// Whether this verb-form keyword marks a function as a generator
    /// (`fiunt`/`fient`).
    pub fn is_generator_marker(self) -> bool {
        matches!(self, Keyword::Fiunt | Keyword::Fient)
    }
}

/// Returns `true` if `word` matches a reserved keyword, case-insensitively.
pub fn is_keyword(word: &str) -> bool {
    get_keyword(word).is_some()
}

/// Looks up the keyword a word denotes, case-insensitively.
///
/// This is the single source of truth the tokenizer consults when deciding
/// whether an identifier-shaped run of characters should become a
/// `TokenKind::Keyword` instead of `TokenKind::Identifier`.
pub fn get_keyword(word: &str) -> Option<Keyword> {
    use Keyword::*;
    let lowered = word.to_ascii_lowercase();
    Some(match lowered.as_str() {
        "varia" => Varia,
        "fixum" => Fixum,
        "fit" => Fit,
        "fiet" => Fiet,
        "fiunt" => Fiunt,
        "fient" => Fient,
        "futura" => Futura,
        "cursor" => Cursor,
        "prae" => Prae,
        "typus" => Typus,
        "si" => Si,
        "aliter" => Aliter,
        "secus" => Secus,
        "sin" => Sin,
        "ergo" => Ergo,
        "sic" => Sic,
        "dum" => Dum,
        "ex" => Ex,
        "pro" => Pro,
        "de" => De,
        "in" => In,
        "discerne" => Discerne,
        "casu" => Casu,
        "ut" => Ut,
        "elige" => Elige,
        "tempta" => Tempta,
        "cape" => Cape,
        "demum" => Demum,
        "iace" => Iace,
        "mori" => Mori,
        "cura" => Cura,
        "cede" => Cede,
        "ante" => Ante,
        "post" => Post,
        "omnia" => Omnia,
        "probandum" => Probandum,
        "proba" => Proba,
        "genus" => Genus,
        "pactum" => Pactum,
        "ordo" => Ordo,
        "discretio" => Discretio,
        "importa" => Importa,
        "usque" => Usque,
        "qua" => Qua,
        "novum" => Novum,
        "finge" => Finge,
        "non" => Non,
        "nulla" => Nulla,
        "nonnulla" => Nonnulla,
        "et" => Et,
        "aut" => Aut,
        "verum" => Verum,
        "falsum" => Falsum,
        "nihil" => Nihil,
        "vacuum" => Vacuum,
        "redde" => Redde,
        "rumpe" => Rumpe,
        "perge" => Perge,
        "scribe" => Scribe,
        "affirma" => Affirma,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_keyword_round_trips_through_its_canonical_spelling() {
        for keyword in Keyword::iter() {
            assert_eq!(get_keyword(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(get_keyword("SI"), Some(Keyword::Si));
        assert_eq!(get_keyword("Discerne"), Some(Keyword::Discerne));
        assert_eq!(get_keyword("ALITER"), Some(Keyword::Aliter));
    }

    #[test]
    fn non_keywords_are_rejected() {
        assert_eq!(get_keyword("puella"), None);
        assert!(!is_keyword("numerus")); // built-in type, not a keyword
    }

    #[test]
    fn async_and_generator_markers() {
        assert!(Keyword::Fiet.is_async_marker());
        assert!(Keyword::Fient.is_async_marker());
        assert!(Keyword::Fient.is_generator_marker());
        assert!(!Keyword::Fit.is_async_marker());
        assert!(!Keyword::Fiunt.is_async_marker());
    }
}
