//! Resolves a surface [`TypeExpr`] into a [`SemanticType`], given whatever
//! user-defined names are currently known (spec.md §4.4: "Latin type names
//! → primitives: exact-match on a small static set ... generics
//! `lista<T>`, `tabula<K,V>`, `copia<T>`, `promissum<T>`, iterators").

use indexmap::IndexMap;

use crate::ast::TypeExpr;
use crate::lexicon::{BuiltinType, TypeCategory};
use crate::semantic::types::{GenericKind, Primitive, SemanticType};

fn primitive_for(name: &str) -> Option<Primitive> {
    match name {
        "textus" => Some(Primitive::Textus),
        "numerus" => Some(Primitive::Numerus),
        "fractus" => Some(Primitive::Fractus),
        "decimus" => Some(Primitive::Decimus),
        "magnus" => Some(Primitive::Magnus),
        "bivalens" => Some(Primitive::Bivalens),
        "nihil" => Some(Primitive::Nihil),
        "vacuum" => Some(Primitive::Vacuum),
        "octeti" => Some(Primitive::Octeti),
        _ => None,
    }
}

fn generic_for(name: &str) -> Option<GenericKind> {
    match name {
        "lista" => Some(GenericKind::Lista),
        "tabula" => Some(GenericKind::Tabula),
        "copia" => Some(GenericKind::Copia),
        "promissum" => Some(GenericKind::Promissum),
        "cursor" => Some(GenericKind::Cursor),
        _ => None,
    }
}

/// Resolves a parsed type annotation, consulting `known_types` (locally
/// declared genus/pactum/ordo/discretio and anything imported) for any name
/// that isn't a built-in. Unknown names become [`SemanticType::User`]
/// placeholders rather than errors — callers decide whether an
/// unresolved name is itself a problem.
pub fn resolve_type_expr(type_expr: &TypeExpr, known_types: &IndexMap<String, SemanticType>) -> SemanticType {
    match type_expr {
        TypeExpr::Nullable(inner) => with_nullable(resolve_type_expr(inner, known_types), true),
        TypeExpr::Union(members) => {
            let resolved: Vec<SemanticType> = members.iter().map(|m| resolve_type_expr(m, known_types)).collect();
            SemanticType::Union { nullable: resolved.iter().any(|m| m.nullable()), members: resolved }
        }
        TypeExpr::Named { name, args, .. } => {
            let lowered = name.to_ascii_lowercase();

            if let Some(primitive) = primitive_for(&lowered) {
                return SemanticType::primitive(primitive, primitive == Primitive::Nihil);
            }

            if let Some(generic) = generic_for(&lowered) {
                let args = args.iter().map(|a| resolve_type_expr(a, known_types)).collect();
                return SemanticType::Generic { kind: generic, args, nullable: false };
            }

            if let Some(known) = known_types.get(name) {
                return known.clone();
            }

            SemanticType::User { name: name.clone(), nullable: false }
        }
    }
}

/// Whether a bare stem names a built-in type (thin wrapper kept alongside
/// [`resolve_type_expr`] so callers checking "is this name already taken by
/// a built-in" don't need to duplicate the match).
pub fn is_builtin_type_name(name: &str) -> bool {
    crate::lexicon::is_builtin_type(name)
}

pub fn builtin_category(name: &str) -> Option<TypeCategory> {
    crate::lexicon::types::parse_type(name).map(BuiltinType::category)
}

fn with_nullable(ty: SemanticType, nullable: bool) -> SemanticType {
    match ty {
        SemanticType::Primitive { kind, bit_size, .. } => SemanticType::Primitive { kind, nullable, bit_size },
        SemanticType::Generic { kind, args, .. } => SemanticType::Generic { kind, args, nullable },
        SemanticType::Function { value, .. } => SemanticType::Function { value, nullable },
        SemanticType::Union { members, .. } => SemanticType::Union { members, nullable },
        SemanticType::User { name, .. } => SemanticType::User { name, nullable },
        SemanticType::Enum { value, .. } => SemanticType::Enum { value, nullable },
        SemanticType::Genus { value, .. } => SemanticType::Genus { value, nullable },
        SemanticType::Pactum { value, .. } => SemanticType::Pactum { value, nullable },
        SemanticType::Discretio { value, .. } => SemanticType::Discretio { value, nullable },
        SemanticType::Unknown => SemanticType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_primitive_by_exact_name() {
        let known = IndexMap::new();
        let type_expr = TypeExpr::Named { name: "numerus".into(), args: vec![], position: crate::position::Position::START };
        assert_eq!(resolve_type_expr(&type_expr, &known), SemanticType::primitive(Primitive::Numerus, false));
    }

    #[test]
    fn resolves_generic_with_type_args() {
        let known = IndexMap::new();
        let inner = TypeExpr::Named { name: "numerus".into(), args: vec![], position: crate::position::Position::START };
        let type_expr = TypeExpr::Named { name: "lista".into(), args: vec![inner], position: crate::position::Position::START };
        match resolve_type_expr(&type_expr, &known) {
            SemanticType::Generic { kind, args, .. } => {
                assert_eq!(kind, GenericKind::Lista);
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Generic, got {other:?}"),
        }
    }

    #[test]
    fn unknown_name_becomes_user_placeholder() {
        let known = IndexMap::new();
        let type_expr = TypeExpr::Named { name: "Point".into(), args: vec![], position: crate::position::Position::START };
        assert_eq!(resolve_type_expr(&type_expr, &known), SemanticType::User { name: "Point".into(), nullable: false });
    }

    #[test]
    fn nullable_wraps_without_double_boxing() {
        let known = IndexMap::new();
        let inner = TypeExpr::Named { name: "numerus".into(), args: vec![], position: crate::position::Position::START };
        let type_expr = TypeExpr::Nullable(Box::new(inner));
        assert!(resolve_type_expr(&type_expr, &known).nullable());
    }
}
