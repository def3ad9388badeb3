//! Built-in type names: primitives, generic collections, and iteration types.
//!
//! Kept as a table distinct from [`super::keywords`] because a word can be a
//! built-in type without being a reserved keyword (`numerus` never starts a
//! statement, so the tokenizer never needs to special-case it) — exactly the
//! separation spec.md §4.1 draws between the keyword table and the built-in
//! type registry. Target-language spellings for these types live in the
//! (out-of-scope) code-generation registries; this module only records the
//! target-independent semantic meaning.

use strum_macros::EnumIter;

/// The four semantic categories spec.md §4.1 assigns to built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Primitive,
    Collection,
    Structural,
    Iteration,
}

/// A built-in type name together with its arity (0 for non-generic
/// primitives, 1 for `lista<T>`/`copia<T>`/`promissum<T>`/`cursor<T>`, 2 for
/// `tabula<K,V>`) and semantic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum BuiltinType {
    Textus,
    Numerus,
    Fractus,
    Decimus,
    Magnus,
    Bivalens,
    Nihil,
    Vacuum,
    Octeti,
    Lista,
    Tabula,
    Copia,
    Promissum,
    Cursor,
}

impl BuiltinType {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Textus => "textus",
            BuiltinType::Numerus => "numerus",
            BuiltinType::Fractus => "fractus",
            BuiltinType::Decimus => "decimus",
            BuiltinType::Magnus => "magnus",
            BuiltinType::Bivalens => "bivalens",
            BuiltinType::Nihil => "nihil",
            BuiltinType::Vacuum => "vacuum",
            BuiltinType::Octeti => "octeti",
            BuiltinType::Lista => "lista",
            BuiltinType::Tabula => "tabula",
            BuiltinType::Copia => "copia",
            BuiltinType::Promissum => "promissum",
            BuiltinType::Cursor => "cursor",
        }
    }

    pub fn category(self) -> TypeCategory {
        use BuiltinType::*;
        match self {
            Textus | Numerus | Fractus | Decimus | Magnus | Bivalens | Nihil | Vacuum | Octeti => {
                TypeCategory::Primitive
            }
            Lista | Tabula | Copia => TypeCategory::Collection,
            Promissum => TypeCategory::Structural,
            Cursor => TypeCategory::Iteration,
        }
    }

    /// Number of type parameters this built-in expects (`tabula<K, V>` is
    /// the sole arity-2 case; primitives are arity-0).
    pub fn arity(self) -> usize {
        use BuiltinType::*;
        match self {
            Tabula => 2,
            Lista | Copia | Promissum | Cursor => 1,
            _ => 0,
        }
    }
}

/// Case-insensitive lookup of a built-in type by its stem (the bare name
/// without generic parameters, e.g. `"lista"` not `"lista<numerus>"`).
pub fn is_builtin_type(stem: &str) -> bool {
    parse_type(stem).is_some()
}

/// Resolves a bare type-name stem to the [`BuiltinType`] it denotes, if any.
pub fn parse_type(stem: &str) -> Option<BuiltinType> {
    use BuiltinType::*;
    let lowered = stem.to_ascii_lowercase();
    Some(match lowered.as_str() {
        "textus" => Textus,
        "numerus" => Numerus,
        "fractus" => Fractus,
        "decimus" => Decimus,
        "magnus" => Magnus,
        "bivalens" => Bivalens,
        "nihil" => Nihil,
        "vacuum" => Vacuum,
        "octeti" => Octeti,
        "lista" => Lista,
        "tabula" => Tabula,
        "copia" => Copia,
        "promissum" => Promissum,
        "cursor" => Cursor,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_builtin_round_trips() {
        for builtin in BuiltinType::iter() {
            assert_eq!(parse_type(builtin.name()), Some(builtin));
        }
    }

    #[test]
    fn categories_match_spec_groupings() {
        assert_eq!(BuiltinType::Numerus.category(), TypeCategory::Primitive);
        assert_eq!(BuiltinType::Lista.category(), TypeCategory::Collection);
        assert_eq!(BuiltinType::Promissum.category(), TypeCategory::Structural);
        assert_eq!(BuiltinType::Cursor.category(), TypeCategory::Iteration);
    }

    #[test]
    fn tabula_is_the_sole_arity_two_generic() {
        assert_eq!(BuiltinType::Tabula.arity(), 2);
        assert_eq!(BuiltinType::Lista.arity(), 1);
        assert_eq!(BuiltinType::Numerus.arity(), 0);
    }

    #[test]
    fn unknown_stems_are_rejected() {
        assert!(!is_builtin_type("puella"));
        assert!(!is_builtin_type("si")); // a keyword, not a type
    }
}
