//! The resolved semantic type lattice and its assignability laws.
//!
//! Grounded on `libtimu::tir::object_signature::TypeValue` (a closed enum
//! of primitive/class/interface/generic kinds) but reshaped around
//! spec.md §3's own closed sum: `{primitive, generic, function, union,
//! user, enum, genus, pactum, discretio, unknown}`, each carrying
//! `nullable: bool`. `IndexMap` is used for genus/pactum/discretio member
//! tables, matching the teacher's preference for order-preserving maps
//! over `std::collections::HashMap` everywhere names matter for
//! diagnostics or deterministic iteration.

use indexmap::IndexMap;

/// The nine built-in primitive names (spec.md §4.4), independent of the
/// lexicon's [`crate::lexicon::BuiltinType`] enum: semantic primitives are
/// the *resolved* type lattice, while `BuiltinType` is the *surface*
/// keyword table the parser consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Textus,
    Numerus,
    Fractus,
    Decimus,
    Magnus,
    Bivalens,
    Nihil,
    Vacuum,
    Octeti,
}

impl Primitive {
    /// `true` for the three mutually-promotable numeric primitives
    /// (spec.md §4.4: "numerics promote mutually").
    pub fn is_numeric(self) -> bool {
        matches!(self, Primitive::Numerus | Primitive::Fractus | Primitive::Decimus)
    }
}

/// The built-in generic container/iterator shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericKind {
    Lista,
    Tabula,
    Copia,
    Promissum,
    Cursor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Vec<SemanticType>,
    pub return_type: Box<SemanticType>,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenusType {
    pub name: String,
    pub fields: IndexMap<String, SemanticType>,
    pub methods: IndexMap<String, FunctionType>,
    pub static_fields: IndexMap<String, SemanticType>,
    pub static_methods: IndexMap<String, FunctionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PactumType {
    pub name: String,
    pub methods: IndexMap<String, FunctionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdoType {
    pub name: String,
    pub members: Vec<String>,
}

/// One `discretio` variant's ordered field list, keyed by field name but
/// remembering declaration order for positional `pro a, b` bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioVariant {
    pub name: String,
    pub fields: IndexMap<String, SemanticType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioType {
    pub name: String,
    pub variants: IndexMap<String, DiscretioVariant>,
}

/// The resolved type of an expression or declared binding.
///
/// `nullable` is carried independently of the variant itself — `numerus?`
/// and `numerus` are the same `Primitive` payload with different
/// `nullable` flags — matching spec.md §3's "each variant carries
/// `nullable: bool`".
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    Primitive { kind: Primitive, nullable: bool, bit_size: Option<u32> },
    Generic { kind: GenericKind, args: Vec<SemanticType>, nullable: bool },
    Function { value: FunctionType, nullable: bool },
    Union { members: Vec<SemanticType>, nullable: bool },
    /// A forward reference to a named concrete type, used during module
    /// resolution before the concrete genus/pactum/ordo/discretio is known
    /// (spec.md §4.4: "a nominal `user(name)` is equal to any concrete
    /// ... with the same name").
    User { name: String, nullable: bool },
    Enum { value: OrdoType, nullable: bool },
    Genus { value: GenusType, nullable: bool },
    Pactum { value: PactumType, nullable: bool },
    Discretio { value: DiscretioType, nullable: bool },
    /// The escape hatch: bidirectionally assignable to and from everything.
    Unknown,
}

impl SemanticType {
    pub fn primitive(kind: Primitive, nullable: bool) -> Self {
        let bit_size = match kind {
            Primitive::Numerus | Primitive::Magnus => Some(64),
            Primitive::Octeti => Some(8),
            _ => None,
        };
        SemanticType::Primitive { kind, nullable, bit_size }
    }

    pub fn nullable(&self) -> bool {
        match self {
            SemanticType::Primitive { nullable, .. }
            | SemanticType::Generic { nullable, .. }
            | SemanticType::Function { nullable, .. }
            | SemanticType::Union { nullable, .. }
            | SemanticType::User { nullable, .. }
            | SemanticType::Enum { nullable, .. }
            | SemanticType::Genus { nullable, .. }
            | SemanticType::Pactum { nullable, .. }
            | SemanticType::Discretio { nullable, .. } => *nullable,
            SemanticType::Unknown => true,
        }
    }

    /// The display name used for nominal comparisons (`user(name)` equals
    /// any concrete declaration sharing this name).
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            SemanticType::User { name, .. } => Some(name),
            SemanticType::Enum { value, .. } => Some(&value.name),
            SemanticType::Genus { value, .. } => Some(&value.name),
            SemanticType::Pactum { value, .. } => Some(&value.name),
            SemanticType::Discretio { value, .. } => Some(&value.name),
            _ => None,
        }
    }

    /// Spec.md §4.4's assignability relation: "`unknown` is assignable
    /// both ways; `nihil` only to nullable targets; numerics promote
    /// mutually; a source is assignable to a union if assignable to some
    /// member; a source union is assignable to a target if every member
    /// is." Nominal `user(name)` placeholders compare equal to any
    /// concrete declaration of the same name in either direction.
    pub fn is_assignable_to(&self, target: &SemanticType) -> bool {
        if matches!(self, SemanticType::Unknown) || matches!(target, SemanticType::Unknown) {
            return true;
        }

        if matches!(self, SemanticType::Primitive { kind: Primitive::Nihil, .. }) {
            return target.nullable();
        }

        if let SemanticType::Union { members, .. } = self {
            return members.iter().all(|member| member.is_assignable_to(target));
        }

        if let SemanticType::Union { members, .. } = target {
            return members.iter().any(|member| self.is_assignable_to(member));
        }

        if let (SemanticType::Primitive { kind: a, .. }, SemanticType::Primitive { kind: b, .. }) = (self, target) {
            if a == b {
                return true;
            }
            return a.is_numeric() && b.is_numeric();
        }

        if let (Some(a), Some(b)) = (self.nominal_name(), target.nominal_name()) {
            if a == b {
                return true;
            }
        }

        if let (SemanticType::Generic { kind: a, args: a_args, .. }, SemanticType::Generic { kind: b, args: b_args, .. }) = (self, target) {
            return a == b && a_args.len() == b_args.len() && a_args.iter().zip(b_args).all(|(x, y)| x.is_assignable_to(y));
        }

        self == target
    }
}
