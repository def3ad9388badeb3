//! Abstract syntax tree node definitions.
//!
//! Grounded on `libtimu::ast`: closed sum types per node family, every node
//! carrying its source [`Position`]. Two deliberate departures from the
//! teacher's shape, both spec-mandated:
//!
//! - Nodes own their data (`String`, `Box<...>`) instead of borrowing
//!   `&'base str` slices from the source. The teacher can borrow because
//!   its AST is consumed immediately by the TIR builder in the same
//!   lifetime scope; this AST is explicitly defined as read-only state that
//!   outlives one parse/analyze call (spec.md §3: "AST nodes are created
//!   once, mutated only to attach resolved types ... then read-only"), so
//!   borrowing the source would entangle the AST's lifetime with the
//!   `SourceFile`'s for no benefit.
//! - `ExprNode::resolved_type` is a plain `Option`, populated by direct
//!   `&mut` mutation during semantic analysis, rather than the teacher's
//!   `Rc`-shared TIR nodes — this AST has no sharing or cycles (spec.md §9:
//!   "nodes form a tree ... allocate them in a bump arena keyed to one
//!   compilation; indices or references are equivalent"), so plain
//!   ownership is the simpler equivalent.

use crate::position::Position;
use crate::semantic::types::SemanticType;

/// A complete parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

/// A type annotation as written in source, before semantic resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A named type, possibly generic (`lista<numerus>`, `textus`, a
    /// user-defined `genus`/`pactum`/`ordo`/`discretio` name).
    Named { name: String, args: Vec<TypeExpr>, position: Position },
    /// `A | B | C` union type.
    Union(Vec<TypeExpr>),
    /// Trailing `?` nullable marker.
    Nullable(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn position(&self) -> Position {
        match self {
            TypeExpr::Named { position, .. } => *position,
            TypeExpr::Union(members) => members.first().map(TypeExpr::position).unwrap_or(Position::START),
            TypeExpr::Nullable(inner) => inner.position(),
        }
    }
}

/// A function parameter: `[prae] [typus] name: TypeExpr`. `is_type_param`
/// distinguishes `prae typus T` (spec.md §4.3: "must precede normal
/// parameters") from ordinary value parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_annotation: Option<TypeExpr>,
    pub is_type_param: bool,
    pub position: Position,
}

/// The four verb forms of the return-arrow family (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionModifiers {
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<Param>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub modifiers: FunctionModifiers,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_annotation: TypeExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenusDecl {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<FunctionDecl>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PactumDecl {
    pub name: String,
    pub methods: Vec<MethodSignature>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdoDecl {
    pub name: String,
    pub members: Vec<String>,
    pub position: Position,
}

/// A single variant of a `discretio` (tagged union), carrying an ordered
/// field list (spec.md §4.4: positional bindings inherit field types "in
/// declaration order from the variant's field list").
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioVariant {
    pub name: String,
    pub fields: Vec<Field>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioDecl {
    pub name: String,
    pub variants: Vec<DiscretioVariant>,
    pub position: Position,
}

/// The binding form of a `discerne` match arm.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscerneBinding {
    /// No binding at all.
    None,
    /// `pro a, b` — positional field bindings.
    Positional(Vec<String>),
    /// `ut c` — bind the whole narrowed value.
    Alias(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscerneArm {
    /// `None` represents the wildcard `_` arm.
    pub variant: Option<String>,
    pub binding: DiscerneBinding,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EligeArm {
    /// `None` represents the `aliter`/`secus` default arm.
    pub guard: Option<ExprNode>,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: ExprNode,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub branches: Vec<ConditionalBranch>,
    pub else_body: Option<Vec<Stmt>>,
    pub position: Position,
}

/// The three `ex`-headed iteration forms (spec.md §4.3).
#[derive(Debug, Clone, PartialEq)]
pub enum IterationForm {
    /// `ex items pro x { ... }`
    ForEach { binding: String },
    /// `ex items fiet x { ... }` — awaits each item.
    ForEachAwait { binding: String },
    /// `ex obj fixum|varia pattern { ... }` — destructuring.
    Destructure { mutable: bool, pattern: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForIteration {
    pub source: ExprNode,
    pub form: IterationForm,
    pub body: Vec<Stmt>,
    pub position: Position,
}

/// `de obj pro k { ... }` — read-only key iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeIteration {
    pub source: ExprNode,
    pub binding: String,
    pub body: Vec<Stmt>,
    pub position: Position,
}

/// `in obj { ... }` — bare identifier assignments inside the block rewrite
/// to property assignments on `obj`.
#[derive(Debug, Clone, PartialEq)]
pub struct InBlock {
    pub target: ExprNode,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: ExprNode,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryCatch {
    pub try_body: Vec<Stmt>,
    pub catch_name: Option<String>,
    pub catch_body: Vec<Stmt>,
    pub finally_body: Option<Vec<Stmt>>,
    pub position: Position,
}

/// `cura [cede] expr fit name { body } cape err { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CuraBlock {
    pub awaits_acquire: bool,
    pub resource: ExprNode,
    pub binding: String,
    pub body: Vec<Stmt>,
    pub catch_name: Option<String>,
    pub catch_body: Option<Vec<Stmt>>,
    pub position: Position,
}

/// `cura ante|post [omnia] { ... }` — test-only setup/teardown hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuraHookTiming {
    Ante,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuraHook {
    pub timing: CuraHookTiming,
    pub applies_to_all: bool,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbandumBlock {
    pub name: String,
    pub body: Vec<Stmt>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbaTest {
    pub modifier: Option<String>,
    pub reason: Option<String>,
    pub name: String,
    pub body: Vec<Stmt>,
    pub position: Position,
}

/// A local file, intrinsic (`norma`), or external module path (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: String,
    /// Bound names; empty means "import the whole module" under its
    /// inferred namespace name.
    pub names: Vec<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub mutable: bool,
    pub type_annotation: Option<TypeExpr>,
    pub name: String,
    pub initializer: Option<ExprNode>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub target: TypeExpr,
    pub position: Position,
}

/// Every statement-level construct spec.md §3 names.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Import(ImportDecl),
    VarDecl(VarDecl),
    FunctionDecl(FunctionDecl),
    TypeAlias(TypeAliasDecl),
    Genus(GenusDecl),
    Pactum(PactumDecl),
    Ordo(OrdoDecl),
    Discretio(DiscretioDecl),
    Conditional(Conditional),
    While(WhileLoop),
    ForIteration(ForIteration),
    DeIteration(DeIteration),
    InBlock(InBlock),
    Discerne { subject: ExprNode, arms: Vec<DiscerneArm>, position: Position },
    Elige { subject: ExprNode, arms: Vec<EligeArm>, position: Position },
    TryCatch(TryCatch),
    Cura(CuraBlock),
    CuraHook(CuraHook),
    Probandum(ProbandumBlock),
    Proba(ProbaTest),
    Return { value: Option<ExprNode>, position: Position },
    Break { position: Position },
    Continue { position: Position },
    Throw { value: ExprNode, position: Position },
    /// The `scribe`-style output intrinsic.
    Output { value: ExprNode, position: Position },
    Assertion { condition: ExprNode, message: Option<ExprNode>, position: Position },
    Expr(ExprNode),
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Stmt::Import(d) => d.position,
            Stmt::VarDecl(d) => d.position,
            Stmt::FunctionDecl(d) => d.position,
            Stmt::TypeAlias(d) => d.position,
            Stmt::Genus(d) => d.position,
            Stmt::Pactum(d) => d.position,
            Stmt::Ordo(d) => d.position,
            Stmt::Discretio(d) => d.position,
            Stmt::Conditional(d) => d.position,
            Stmt::While(d) => d.position,
            Stmt::ForIteration(d) => d.position,
            Stmt::DeIteration(d) => d.position,
            Stmt::InBlock(d) => d.position,
            Stmt::Discerne { position, .. } => *position,
            Stmt::Elige { position, .. } => *position,
            Stmt::TryCatch(d) => d.position,
            Stmt::Cura(d) => d.position,
            Stmt::CuraHook(d) => d.position,
            Stmt::Probandum(d) => d.position,
            Stmt::Proba(d) => d.position,
            Stmt::Return { position, .. } => *position,
            Stmt::Break { position } => *position,
            Stmt::Continue { position } => *position,
            Stmt::Throw { position, .. } => *position,
            Stmt::Output { position, .. } => *position,
            Stmt::Assertion { position, .. } => *position,
            Stmt::Expr(e) => e.position,
        }
    }
}

/// A binary operator, named independently of [`crate::token::Operator`]
/// since not every token maps to a binary operator and vice versa (`=>` and
/// `{` never appear here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitOr,
    BitXor,
    BitAnd,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberAccessKind {
    /// Plain `.` access.
    Direct,
    /// `?.` — short-circuits to `nihil` if the receiver is null.
    OptionalChaining,
    /// `!.` — asserts non-null, panics at runtime if the receiver is null.
    NonNullAssertion,
}

/// A field initializer inside a `novum Genus { field: expr, ... }`
/// construction expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: String,
    pub value: ExprNode,
}

/// Every expression-level construct spec.md §3 names.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLiteral(String),
    BigIntLiteral(String),
    StringLiteral(String),
    TemplateLiteral(String),
    BoolLiteral(bool),
    NihilLiteral,
    VacuumLiteral,
    Identifier(String),
    Binary { op: BinaryOp, left: Box<ExprNode>, right: Box<ExprNode> },
    Unary { op: UnaryOp, operand: Box<ExprNode> },
    Call { callee: Box<ExprNode>, type_args: Vec<TypeExpr>, args: Vec<ExprNode> },
    Member { object: Box<ExprNode>, property: String, kind: MemberAccessKind },
    Index { object: Box<ExprNode>, index: Box<ExprNode> },
    Range { start: Box<ExprNode>, end: Box<ExprNode>, inclusive: bool },
    /// `novum Genus { field: expr, ... }` construction.
    Novum { type_name: TypeExpr, fields: Vec<FieldInit> },
    /// `expr qua Type` cast.
    Qua { value: Box<ExprNode>, target: TypeExpr },
    Lambda { params: Vec<Param>, body: Vec<Stmt>, modifiers: FunctionModifiers },
    Assignment { target: Box<ExprNode>, value: Box<ExprNode> },
    /// `condition sic then secus else` ternary.
    Conditional { condition: Box<ExprNode>, then_branch: Box<ExprNode>, else_branch: Box<ExprNode> },
    /// `finge Variant { field: expr, ... }` variant constructor.
    Finge { variant: String, fields: Vec<FieldInit> },
}

/// An expression node: its shape, source position, and — once semantic
/// analysis has run — its resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub position: Position,
    pub resolved_type: Option<SemanticType>,
}

impl ExprNode {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Self { kind, position, resolved_type: None }
    }
}
