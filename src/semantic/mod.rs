//! Multi-pass semantic analysis: scoped symbol tables, type resolution,
//! module resolution, and pattern-match typing (spec.md §4.4).
//!
//! Grounded on `libtimu::tir`'s builder/context split — a `TirContext`
//! walking the AST while consulting a scope stack and a type registry — but
//! reshaped so every failure becomes a [`SemanticError`] pushed onto an
//! accumulating list rather than an early return, matching spec.md §7's
//! "analysis never throws on semantic errors" rule.

pub mod error;
pub mod module;
pub mod resolve_type;
pub mod scope;
pub mod types;

pub use error::SemanticError;
pub use module::{ModuleCache, ModuleExports, ModuleKind};
pub use scope::{Binding, ScopeStack};
pub use types::{DiscretioType, FunctionType, GenusType, OrdoType, PactumType, Primitive, SemanticType};

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::ast::{
    ConditionalBranch, DiscerneBinding, ExprKind, ExprNode, FunctionDecl, IterationForm, MemberAccessKind, Program, Stmt, TypeExpr, UnaryOp, VarDecl,
};
use crate::position::Position;
use crate::semantic::module::{build_known_types, classify, resolve_local_path, ModuleKind as Kind};
use crate::semantic::resolve_type::resolve_type_expr;
use crate::semantic::types::GenericKind;

/// Options accepted by [`analyze`] (spec.md §6: `analyze(program,
/// {filePath?})`). `file_path` anchors local import resolution; it is
/// absent for single-snippet analysis with no module system involved.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub file_path: Option<PathBuf>,
}

/// The external entry point: resolves names and types over `program`,
/// mutating its expression nodes' `resolved_type` fields in place, and
/// returns it alongside every [`SemanticError`] collected along the way.
/// Analysis never aborts early; every statement is visited regardless of
/// earlier errors (spec.md §7).
pub fn analyze(mut program: Program, options: AnalysisOptions) -> (Program, Vec<SemanticError>) {
    let mut cache = ModuleCache::new();
    let base_dir = options.file_path.as_deref().and_then(Path::parent).map(Path::to_path_buf).unwrap_or_default();
    let errors = analyze_program(&mut program, &mut cache, &base_dir);
    (program, errors)
}

/// The worker shared by [`analyze`] and [`ModuleCache::load`]'s recursive
/// callback (spec.md §4.4: "the importer first resolves *its* imports").
/// Takes `&mut Program` so the top-level call can attach resolved types;
/// nested modules loaded purely for their exports are walked the same way,
/// their mutations simply discarded once [`module::extract_exports`]-style
/// logic has read what it needs from the (immutable) export pass.
pub fn analyze_program(program: &mut Program, cache: &mut ModuleCache, base_dir: &Path) -> Vec<SemanticError> {
    let known_types = build_known_types(program);
    let mut analyzer = Analyzer::new(cache, base_dir.to_path_buf(), known_types);
    analyzer.hoist_functions(&program.statements);
    for stmt in &mut program.statements {
        analyzer.check_stmt(stmt);
    }
    analyzer.errors
}

/// One analysis's working state: the scope stack, the locally-known type
/// environment (genus/pactum/ordo/discretio, plus anything imported), the
/// shared module cache, and the accumulating error list.
struct Analyzer<'c> {
    cache: &'c mut ModuleCache,
    base_dir: PathBuf,
    known_types: IndexMap<String, SemanticType>,
    scopes: ScopeStack,
    errors: Vec<SemanticError>,
    /// Whether the analyzer is currently inside a function body whose
    /// return type is declared, and what that type is — used to type-check
    /// `redde` statements. `None` outside any function.
    current_return_type: Vec<Option<SemanticType>>,
}

impl<'c> Analyzer<'c> {
    fn new(cache: &'c mut ModuleCache, base_dir: PathBuf, known_types: IndexMap<String, SemanticType>) -> Self {
        // Function and genus/pactum declarations are themselves visible at
        // module scope before their bodies are analyzed (via `known_types`
        // and the module's export pass), so recursive self-reference and
        // forward reference both work without an extra pre-declaration
        // pass here (spec.md §4.4: "recursive self-reference is allowed
        // because the function name is bound before its body is
        // analyzed").
        Self { cache, base_dir, known_types, scopes: ScopeStack::new(), errors: Vec::new(), current_return_type: Vec::new() }
    }

    fn resolve(&self, type_expr: &TypeExpr) -> SemanticType {
        resolve_type_expr(type_expr, &self.known_types)
    }

    fn function_type_of(&self, decl: &FunctionDecl) -> FunctionType {
        let params = decl.params.iter().filter(|p| !p.is_type_param).map(|p| p.type_annotation.as_ref().map(|t| self.resolve(t)).unwrap_or(SemanticType::Unknown)).collect();
        let return_type = decl.return_type.as_ref().map(|t| self.resolve(t)).unwrap_or(SemanticType::Unknown);
        FunctionType { params, return_type: Box::new(return_type), is_async: decl.modifiers.is_async, is_generator: decl.modifiers.is_generator }
    }

    /// Binds every function name declared directly in `stmts` before any of
    /// their bodies are checked, so recursive self-reference and
    /// out-of-order forward reference both resolve (spec.md §4.4).
    fn hoist_functions(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            if let Stmt::FunctionDecl(decl) = stmt {
                let ty = SemanticType::Function { value: self.function_type_of(decl), nullable: false };
                if !self.scopes.declare(&decl.name, ty, false, decl.position) {
                    self.errors.push(SemanticError::DuplicateDeclaration { name: decl.name.clone(), position: decl.position });
                }
            }
        }
    }

    // --- statements ---

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Import(decl) => self.check_import(decl),
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::FunctionDecl(decl) => self.check_function_decl(decl),
            Stmt::TypeAlias(_) | Stmt::Genus(_) | Stmt::Pactum(_) | Stmt::Ordo(_) | Stmt::Discretio(_) => {
                // Already folded into `known_types` by `build_known_types`;
                // nothing further to check at declaration time (method
                // bodies, if any, are checked via `check_function_decl`
                // when genus methods are visited below).
                if let Stmt::Genus(genus) = stmt {
                    for method in &mut genus.methods {
                        self.check_function_decl(method);
                    }
                }
            }
            Stmt::Conditional(cond) => {
                for branch in &mut cond.branches {
                    self.check_branch(branch);
                }
                if let Some(else_body) = &mut cond.else_body {
                    self.check_block(else_body);
                }
            }
            Stmt::While(loop_) => {
                self.check_expr(&mut loop_.condition);
                self.check_block(&mut loop_.body);
            }
            Stmt::ForIteration(iter) => self.check_for_iteration(iter),
            Stmt::DeIteration(iter) => {
                self.check_expr(&mut iter.source);
                self.scopes.enter();
                self.scopes.declare(&iter.binding, SemanticType::Unknown, false, iter.position);
                self.check_block(&mut iter.body);
                self.scopes.leave();
            }
            Stmt::InBlock(block) => {
                self.check_expr(&mut block.target);
                rewrite_bare_assignments_onto_target(&block.target, &mut block.body);
                self.check_block(&mut block.body);
            }
            Stmt::Discerne { subject, arms, .. } => self.check_discerne(subject, arms),
            Stmt::Elige { subject, arms, .. } => {
                self.check_expr(subject);
                for arm in arms {
                    self.scopes.enter();
                    if let Some(guard) = &mut arm.guard {
                        self.check_expr(guard);
                    }
                    self.check_block(&mut arm.body);
                    self.scopes.leave();
                }
            }
            Stmt::TryCatch(try_catch) => {
                self.check_block(&mut try_catch.try_body);
                if try_catch.catch_name.is_some() || !try_catch.catch_body.is_empty() {
                    self.scopes.enter();
                    if let Some(name) = &try_catch.catch_name {
                        self.scopes.declare(name, SemanticType::Unknown, false, try_catch.position);
                    }
                    self.check_block(&mut try_catch.catch_body);
                    self.scopes.leave();
                }
                if let Some(finally_body) = &mut try_catch.finally_body {
                    self.check_block(finally_body);
                }
            }
            Stmt::Cura(cura) => {
                self.check_expr(&mut cura.resource);
                self.scopes.enter();
                self.scopes.declare(&cura.binding, SemanticType::Unknown, false, cura.position);
                self.check_block(&mut cura.body);
                self.scopes.leave();
                if let Some(catch_body) = &mut cura.catch_body {
                    self.scopes.enter();
                    if let Some(name) = &cura.catch_name {
                        self.scopes.declare(name, SemanticType::Unknown, false, cura.position);
                    }
                    self.check_block(catch_body);
                    self.scopes.leave();
                }
            }
            Stmt::CuraHook(hook) => self.check_block(&mut hook.body),
            Stmt::Probandum(block) => self.check_block(&mut block.body),
            Stmt::Proba(test) => self.check_block(&mut test.body),
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.check_expr(value);
                    if let Some(Some(expected)) = self.current_return_type.last().cloned() {
                        if let Some(found) = &value.resolved_type {
                            if !found.is_assignable_to(&expected) {
                                self.errors.push(SemanticError::TypeMismatch {
                                    expected: format!("{expected:?}"),
                                    found: format!("{found:?}"),
                                    position: value.position,
                                });
                            }
                        }
                    }
                }
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::Throw { value, .. } => self.check_expr(value),
            Stmt::Output { value, .. } => self.check_expr(value),
            Stmt::Assertion { condition, message, .. } => {
                self.check_expr(condition);
                if let Some(message) = message {
                    self.check_expr(message);
                }
            }
            Stmt::Expr(expr) => self.check_expr(expr),
        }
    }

    fn check_block(&mut self, body: &mut [Stmt]) {
        self.scopes.enter();
        self.hoist_functions(body);
        for stmt in body {
            self.check_stmt(stmt);
        }
        self.scopes.leave();
    }

    fn check_branch(&mut self, branch: &mut ConditionalBranch) {
        self.check_expr(&mut branch.condition);
        self.check_block(&mut branch.body);
    }

    fn check_import(&mut self, decl: &mut crate::ast::ImportDecl) {
        match classify(&decl.path) {
            Kind::Intrinsic => {
                // Compiler intrinsics have no local module to load; every
                // bound name resolves to `unknown` rather than an error.
                for name in &decl.names {
                    self.scopes.declare(name, SemanticType::Unknown, false, decl.position);
                }
            }
            Kind::External => {
                for name in &decl.names {
                    self.scopes.declare(name, SemanticType::Unknown, false, decl.position);
                }
            }
            Kind::Local => {
                let resolved = resolve_local_path(&self.base_dir, &decl.path);
                let mut nested_errors = Vec::new();
                let exports = self.cache.load(&resolved, decl.position, &mut nested_errors, &mut |program, cache, dir| analyze_program(program, cache, dir));
                // A missing module already reports `ModuleNotFound`; don't
                // also cascade an `ExportNotFound` for every bound name.
                let module_missing = nested_errors.iter().any(|e| matches!(e, SemanticError::ModuleNotFound { .. }));
                self.errors.append(&mut nested_errors);

                if decl.names.is_empty() {
                    // Whole-module import: nothing further to bind here —
                    // downstream code generators resolve the namespace
                    // object themselves (out of scope for the analyzer).
                    return;
                }
                for name in &decl.names {
                    let ty = exports.exports.get(name).map(|export| export.ty.clone()).unwrap_or_else(|| {
                        if !module_missing {
                            self.errors.push(SemanticError::ExportNotFound { name: name.clone(), path: decl.path.clone(), position: decl.position });
                        }
                        SemanticType::Unknown
                    });
                    self.scopes.declare(name, ty, false, decl.position);
                }
            }
        }
    }

    fn check_var_decl(&mut self, decl: &mut VarDecl) {
        let declared_type = decl.type_annotation.as_ref().map(|t| self.resolve(t));

        if let Some(initializer) = &mut decl.initializer {
            self.check_expr(initializer);
            if let (Some(declared), Some(found)) = (&declared_type, &initializer.resolved_type) {
                if !found.is_assignable_to(declared) {
                    self.errors.push(SemanticError::TypeMismatch {
                        expected: format!("{declared:?}"),
                        found: format!("{found:?}"),
                        position: initializer.position,
                    });
                }
            }
        }

        let ty = declared_type.or_else(|| decl.initializer.as_ref().and_then(|init| init.resolved_type.clone())).unwrap_or(SemanticType::Unknown);

        if !self.scopes.declare(&decl.name, ty, decl.mutable, decl.position) {
            self.errors.push(SemanticError::DuplicateDeclaration { name: decl.name.clone(), position: decl.position });
        }
    }

    fn check_function_decl(&mut self, decl: &mut FunctionDecl) {
        // The function's own name is bound by `hoist_functions` in the
        // enclosing scope before this runs, so recursive self-reference and
        // forward reference both work; nothing to declare here beyond its
        // parameters.
        let return_type = decl.return_type.as_ref().map(|t| self.resolve(t));

        self.scopes.enter();
        for param in &decl.params {
            if param.is_type_param {
                continue;
            }
            let ty = param.type_annotation.as_ref().map(|t| self.resolve(t)).unwrap_or(SemanticType::Unknown);
            self.scopes.declare(&param.name, ty, true, param.position);
        }
        self.hoist_functions(&decl.body);
        self.current_return_type.push(return_type);
        for stmt in &mut decl.body {
            self.check_stmt(stmt);
        }
        self.current_return_type.pop();
        self.scopes.leave();
    }

    fn check_for_iteration(&mut self, iter: &mut crate::ast::ForIteration) {
        self.check_expr(&mut iter.source);
        self.scopes.enter();
        match &iter.form {
            IterationForm::ForEach { binding } | IterationForm::ForEachAwait { binding } => {
                let element_type = match &iter.source.resolved_type {
                    Some(SemanticType::Generic { args, .. }) => args.first().cloned().unwrap_or(SemanticType::Unknown),
                    _ => SemanticType::Unknown,
                };
                self.scopes.declare(binding, element_type, false, iter.position);
            }
            IterationForm::Destructure { mutable, pattern } => {
                for name in pattern {
                    self.scopes.declare(name, SemanticType::Unknown, *mutable, iter.position);
                }
            }
        }
        self.check_block(&mut iter.body);
        self.scopes.leave();
    }

    /// Variant-aware pattern-match typing (spec.md §4.4). When `subject`'s
    /// resolved type is a `discretio`, each arm's variant name is checked
    /// against its variant map; positional bindings (`pro a, b`) inherit
    /// field types in declaration order, alias bindings (`ut c`) type the
    /// alias as the discretio itself but are narrowed to the matched
    /// variant (`Binding::narrowed_variant`), so member access on the
    /// alias only ever sees that variant's fields.
    fn check_discerne(&mut self, subject: &mut ExprNode, arms: &mut [crate::ast::DiscerneArm]) {
        self.check_expr(subject);
        let discretio = match &subject.resolved_type {
            Some(SemanticType::Discretio { value, .. }) => Some(value.clone()),
            _ => None,
        };

        for arm in arms {
            self.scopes.enter();
            if let Some(variant_name) = &arm.variant {
                match &discretio {
                    Some(discretio_type) => match discretio_type.variants.get(variant_name) {
                        Some(variant) => match &arm.binding {
                            DiscerneBinding::Positional(names) => {
                                for (name, (_, field_type)) in names.iter().zip(variant.fields.iter()) {
                                    self.scopes.declare(name, field_type.clone(), false, arm.position);
                                }
                            }
                            DiscerneBinding::Alias(name) => {
                                self.scopes.declare(name, SemanticType::Discretio { value: discretio_type.clone(), nullable: false }, false, arm.position);
                                // Narrow `name` to the matched variant so
                                // `check_member` scopes field access to it
                                // alone, instead of searching every variant
                                // (spec.md §4.4: "ut" binds the value
                                // narrowed to the variant).
                                if let Some(binding) = self.scopes.lookup_mut(name) {
                                    binding.narrowed_variant = Some(variant_name.clone());
                                }
                            }
                            DiscerneBinding::None => {}
                        },
                        None => {
                            self.errors.push(SemanticError::UnknownVariant {
                                discretio: discretio_type.name.clone(),
                                variant: variant_name.clone(),
                                position: arm.position,
                            });
                        }
                    },
                    None => {
                        if let DiscerneBinding::Positional(names) = &arm.binding {
                            for name in names {
                                self.scopes.declare(name, SemanticType::Unknown, false, arm.position);
                            }
                        }
                    }
                }
            }
            self.check_block(&mut arm.body);
            self.scopes.leave();
        }
    }

    // --- expressions ---

    fn check_expr(&mut self, expr: &mut ExprNode) {
        let resolved = self.infer_expr(expr);
        expr.resolved_type = Some(resolved);
    }

    fn infer_expr(&mut self, expr: &mut ExprNode) -> SemanticType {
        match &mut expr.kind {
            ExprKind::NumberLiteral(text) => {
                // Decimal-point literals resolve to `fractus`, integers to
                // `numerus` (spec.md §4.4: "numeric literal inference").
                if text.contains('.') {
                    SemanticType::primitive(Primitive::Fractus, false)
                } else {
                    SemanticType::primitive(Primitive::Numerus, false)
                }
            }
            ExprKind::BigIntLiteral(_) => SemanticType::primitive(Primitive::Magnus, false),
            ExprKind::StringLiteral(_) | ExprKind::TemplateLiteral(_) => SemanticType::primitive(Primitive::Textus, false),
            ExprKind::BoolLiteral(_) => SemanticType::primitive(Primitive::Bivalens, false),
            ExprKind::NihilLiteral => SemanticType::primitive(Primitive::Nihil, true),
            ExprKind::VacuumLiteral => SemanticType::primitive(Primitive::Vacuum, true),
            ExprKind::Identifier(name) => match self.scopes.lookup(name) {
                Some(binding) => binding.ty.clone(),
                None => {
                    self.errors.push(SemanticError::UndefinedVariable { name: name.clone(), position: expr.position });
                    SemanticType::Unknown
                }
            },
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right, expr.position),
            ExprKind::Unary { op, operand } => {
                self.check_expr(operand);
                match op {
                    UnaryOp::Neg => operand.resolved_type.clone().unwrap_or(SemanticType::Unknown),
                    UnaryOp::Not | UnaryOp::IsNull | UnaryOp::IsNotNull => SemanticType::primitive(Primitive::Bivalens, false),
                }
            }
            ExprKind::Call { callee, args, .. } => {
                self.check_expr(callee);
                for arg in args.iter_mut() {
                    self.check_expr(arg);
                }
                match &callee.resolved_type {
                    Some(SemanticType::Function { value, .. }) => (*value.return_type).clone(),
                    _ => SemanticType::Unknown,
                }
            }
            ExprKind::Member { object, property, kind } => self.check_member(object, property, kind, expr.position),
            ExprKind::Index { object, index } => {
                self.check_expr(object);
                self.check_expr(index);
                match &object.resolved_type {
                    Some(SemanticType::Generic { kind: GenericKind::Lista, args, .. }) => args.first().cloned().unwrap_or(SemanticType::Unknown),
                    Some(SemanticType::Generic { kind: GenericKind::Tabula, args, .. }) => args.get(1).cloned().unwrap_or(SemanticType::Unknown),
                    _ => SemanticType::Unknown,
                }
            }
            ExprKind::Range { start, end, .. } => {
                self.check_expr(start);
                self.check_expr(end);
                SemanticType::Generic { kind: GenericKind::Lista, args: vec![SemanticType::primitive(Primitive::Numerus, false)], nullable: false }
            }
            ExprKind::Novum { type_name, fields } => {
                let ty = self.resolve(type_name);
                for field in fields.iter_mut() {
                    self.check_expr(&mut field.value);
                }
                ty
            }
            ExprKind::Qua { value, target } => {
                self.check_expr(value);
                self.resolve(target)
            }
            ExprKind::Lambda { params, body, modifiers } => {
                self.scopes.enter();
                for param in params.iter() {
                    if param.is_type_param {
                        continue;
                    }
                    let ty = param.type_annotation.as_ref().map(|t| self.resolve(t)).unwrap_or(SemanticType::Unknown);
                    self.scopes.declare(&param.name, ty, true, param.position);
                }
                self.current_return_type.push(None);
                for stmt in body.iter_mut() {
                    self.check_stmt(stmt);
                }
                self.current_return_type.pop();
                self.scopes.leave();
                let params: Vec<SemanticType> = params
                    .iter()
                    .filter(|p| !p.is_type_param)
                    .map(|p| p.type_annotation.as_ref().map(|t| self.resolve(t)).unwrap_or(SemanticType::Unknown))
                    .collect();
                SemanticType::Function {
                    value: FunctionType { params, return_type: Box::new(SemanticType::Unknown), is_async: modifiers.is_async, is_generator: modifiers.is_generator },
                    nullable: false,
                }
            }
            ExprKind::Assignment { target, value } => {
                self.check_expr(value);
                self.check_assignment_target(target, value.resolved_type.clone().unwrap_or(SemanticType::Unknown), value.position);
                value.resolved_type.clone().unwrap_or(SemanticType::Unknown)
            }
            ExprKind::Conditional { condition, then_branch, else_branch } => {
                self.check_expr(condition);
                self.check_expr(then_branch);
                self.check_expr(else_branch);
                then_branch.resolved_type.clone().unwrap_or(SemanticType::Unknown)
            }
            ExprKind::Finge { variant, fields } => {
                for field in fields.iter_mut() {
                    self.check_expr(&mut field.value);
                }
                SemanticType::User { name: variant.clone(), nullable: false }
            }
        }
    }

    fn check_binary(&mut self, op: crate::ast::BinaryOp, left: &mut ExprNode, right: &mut ExprNode, position: Position) -> SemanticType {
        use crate::ast::BinaryOp as Op;
        self.check_expr(left);
        self.check_expr(right);
        let left_ty = left.resolved_type.clone().unwrap_or(SemanticType::Unknown);
        let right_ty = right.resolved_type.clone().unwrap_or(SemanticType::Unknown);

        match op {
            Op::Add => {
                let both_text = matches!(&left_ty, SemanticType::Primitive { kind: Primitive::Textus, .. }) && matches!(&right_ty, SemanticType::Primitive { kind: Primitive::Textus, .. });
                if both_text {
                    return SemanticType::primitive(Primitive::Textus, false);
                }
                self.require_numeric_pair(&left_ty, &right_ty, position);
                left_ty
            }
            Op::Sub | Op::Mul | Op::Div | Op::Rem => {
                self.require_numeric_pair(&left_ty, &right_ty, position);
                left_ty
            }
            Op::Lt | Op::LtEq | Op::Gt | Op::GtEq => {
                SemanticType::primitive(Primitive::Bivalens, false)
            }
            Op::Eq | Op::StrictEq | Op::NotEq | Op::StrictNotEq => {
                if !left_ty.is_assignable_to(&right_ty) && !right_ty.is_assignable_to(&left_ty) {
                    self.errors.push(SemanticError::TypeMismatch { expected: format!("{left_ty:?}"), found: format!("{right_ty:?}"), position });
                }
                SemanticType::primitive(Primitive::Bivalens, false)
            }
            Op::And | Op::Or => SemanticType::primitive(Primitive::Bivalens, false),
            Op::BitOr | Op::BitXor | Op::BitAnd => left_ty,
            Op::Range => SemanticType::Generic { kind: GenericKind::Lista, args: vec![left_ty], nullable: false },
        }
    }

    fn require_numeric_pair(&mut self, left: &SemanticType, right: &SemanticType, position: Position) {
        let numeric = |ty: &SemanticType| matches!(ty, SemanticType::Primitive { kind, .. } if kind.is_numeric()) || matches!(ty, SemanticType::Unknown);
        if !numeric(left) || !numeric(right) {
            self.errors.push(SemanticError::TypeMismatch { expected: "a numeric type".to_string(), found: format!("{left:?} and {right:?}"), position });
        }
    }

    fn check_member(&mut self, object: &mut ExprNode, property: &str, kind: &MemberAccessKind, _position: Position) -> SemanticType {
        // A `ut`-aliased discerne binding is narrowed to one variant
        // (`Binding::narrowed_variant`); look that up before re-checking
        // `object`, which would otherwise only tell us the binding's
        // un-narrowed `Discretio` type.
        let narrowed_variant = match &object.kind {
            ExprKind::Identifier(name) => self.scopes.lookup(name).and_then(|binding| binding.narrowed_variant.clone()),
            _ => None,
        };

        self.check_expr(object);
        let base_type = match &object.resolved_type {
            Some(SemanticType::Genus { value, .. }) => value.fields.get(property).cloned().or_else(|| value.methods.get(property).map(|m| SemanticType::Function { value: m.clone(), nullable: false })),
            Some(SemanticType::Pactum { value, .. }) => value.methods.get(property).map(|m| SemanticType::Function { value: m.clone(), nullable: false }),
            Some(SemanticType::Discretio { value, .. }) => match &narrowed_variant {
                // Narrowed: only the matched variant's fields are visible,
                // so a field that belongs to a different variant resolves
                // to `unknown` rather than being found by a wider search.
                Some(variant_name) => value.variants.get(variant_name).and_then(|variant| variant.fields.get(property).cloned()),
                None => value.variants.values().find_map(|variant| variant.fields.get(property).cloned()),
            },
            _ => None,
        };
        let resolved = base_type.unwrap_or(SemanticType::Unknown);
        match kind {
            MemberAccessKind::OptionalChaining => resolved_as_nullable(resolved),
            MemberAccessKind::Direct | MemberAccessKind::NonNullAssertion => resolved,
        }
    }

    fn check_assignment_target(&mut self, target: &mut ExprNode, value_type: SemanticType, position: Position) {
        match &mut target.kind {
            ExprKind::Identifier(name) => {
                let binding = self.scopes.lookup(name).cloned();
                match binding {
                    Some(binding) => {
                        if !binding.mutable {
                            self.errors.push(SemanticError::ImmutableReassignment { name: name.clone(), position });
                        } else if !value_type.is_assignable_to(&binding.ty) {
                            self.errors.push(SemanticError::TypeMismatch { expected: format!("{:?}", binding.ty), found: format!("{value_type:?}"), position });
                        }
                        target.resolved_type = Some(binding.ty);
                    }
                    None => {
                        self.errors.push(SemanticError::UndefinedVariable { name: name.clone(), position });
                        target.resolved_type = Some(SemanticType::Unknown);
                    }
                }
            }
            ExprKind::Member { .. } => {
                self.check_expr(target);
                if let Some(field_ty) = target.resolved_type.clone() {
                    if !value_type.is_assignable_to(&field_ty) {
                        self.errors.push(SemanticError::TypeMismatch { expected: format!("{field_ty:?}"), found: format!("{value_type:?}"), position });
                    }
                }
            }
            ExprKind::Index { .. } => {
                self.check_expr(target);
            }
            _ => {
                self.check_expr(target);
            }
        }
    }
}

/// `in target { … }` rewrites bare identifier assignments directly inside
/// the block onto `target` as property assignments (spec.md §4.3), so `x =
/// 1` becomes `target.x = 1` rather than a local-scope assignment. Runs
/// before the block's statements are checked, so `check_assignment_target`
/// sees a `Member` expression and type-checks against `target`'s field,
/// never a local lookup.
fn rewrite_bare_assignments_onto_target(target: &ExprNode, body: &mut [Stmt]) {
    for stmt in body {
        let Stmt::Expr(expr) = stmt else { continue };
        let ExprKind::Assignment { target: assign_target, .. } = &mut expr.kind else { continue };
        let ExprKind::Identifier(name) = &assign_target.kind else { continue };
        let property = name.clone();
        assign_target.kind = ExprKind::Member { object: Box::new(target.clone()), property, kind: MemberAccessKind::Direct };
    }
}

fn resolved_as_nullable(ty: SemanticType) -> SemanticType {
    match ty {
        SemanticType::Primitive { kind, bit_size, .. } => SemanticType::Primitive { kind, nullable: true, bit_size },
        SemanticType::Generic { kind, args, .. } => SemanticType::Generic { kind, args, nullable: true },
        SemanticType::Function { value, .. } => SemanticType::Function { value, nullable: true },
        SemanticType::Union { members, .. } => SemanticType::Union { members, nullable: true },
        SemanticType::User { name, .. } => SemanticType::User { name, nullable: true },
        SemanticType::Enum { value, .. } => SemanticType::Enum { value, nullable: true },
        SemanticType::Genus { value, .. } => SemanticType::Genus { value, nullable: true },
        SemanticType::Pactum { value, .. } => SemanticType::Pactum { value, nullable: true },
        SemanticType::Discretio { value, .. } => SemanticType::Discretio { value, nullable: true },
        SemanticType::Unknown => SemanticType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;

    fn analyze_source(source: &str) -> (Program, Vec<SemanticError>) {
        let file = SourceFile::in_memory(source);
        let (tokens, lex_errors) = crate::tokenizer::tokenize(&file);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
        let (program, parse_errors) = crate::parser::parse(&tokens);
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
        analyze(program.unwrap(), AnalysisOptions::default())
    }

    #[test]
    fn scenario_1_var_decl_resolves_to_numerus() {
        let (program, errors) = analyze_source("varia numerus x = 5");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.statements[0] {
            Stmt::VarDecl(decl) => {
                let resolved = decl.initializer.as_ref().unwrap().resolved_type.as_ref().unwrap();
                assert_eq!(*resolved, SemanticType::primitive(Primitive::Numerus, false));
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn scenario_2_immutable_reassignment_is_an_error() {
        let (_, errors) = analyze_source("fixum x = 5\nx = 10");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SemanticError::ImmutableReassignment { .. }));
    }

    #[test]
    fn scenario_3_type_mismatch_on_reassignment() {
        let (_, errors) = analyze_source("varia numerus x = 5\nx = \"hello\"");
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            SemanticError::TypeMismatch { .. } => {}
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn scenario_4_discerne_positional_binding_types_mismatch() {
        let source = "discretio Event { Click { numerus x, numerus y } Quit }\n\
                       cercare(Event evt) vacuum fit {\n\
                       discerne evt { casu Click pro a, b { varia textus wrong = a } casu Quit { redde } casu _ { redde } }\n\
                       }";
        let (_, errors) = analyze_source(source);
        assert_eq!(errors.iter().filter(|e| matches!(e, SemanticError::TypeMismatch { .. })).count(), 1);
    }

    #[test]
    fn undefined_variable_resolves_to_unknown_and_reports() {
        let (program, errors) = analyze_source("scribe y");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SemanticError::UndefinedVariable { .. }));
        match &program.statements[0] {
            Stmt::Output { value, .. } => assert_eq!(value.resolved_type, Some(SemanticType::Unknown)),
            other => panic!("expected Output, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_declaration_in_same_scope_is_reported() {
        let (_, errors) = analyze_source("varia numerus x = 1\nvaria numerus x = 2");
        assert!(errors.iter().any(|e| matches!(e, SemanticError::DuplicateDeclaration { .. })));
    }

    #[test]
    fn shadowing_in_inner_block_is_not_a_duplicate() {
        let (_, errors) = analyze_source("varia numerus x = 1\nsi verum { varia numerus x = 2 }");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn recursive_function_can_call_itself() {
        let (_, errors) = analyze_source("factorial(numerus n) numerus fit { redde factorial(n) }");
        assert!(!errors.iter().any(|e| matches!(e, SemanticError::UndefinedVariable { .. })), "{errors:?}");
    }

    #[test]
    fn numeric_promotion_across_additive_operands_is_accepted() {
        let (_, errors) = analyze_source("varia numerus x = 1\nvaria fractus y = 2.0\nx + y");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn module_not_found_reports_and_binds_unknown() {
        let (program, errors) = analyze_source("importa { helper } ex \"./does-not-exist\"");
        assert!(errors.iter().any(|e| matches!(e, SemanticError::ModuleNotFound { .. })));
        let _ = program;
    }

    #[test]
    fn discerne_alias_binding_narrows_member_access_to_the_matched_variant() {
        let source = "discretio Event { Click { numerus x } Quit { textus reason } }\n\
                       cercare(Event evt) vacuum fit {\n\
                       discerne evt {\n\
                           casu Click ut c { varia numerus ok = c.x varia textus leak = c.reason }\n\
                           casu Quit ut c { redde }\n\
                           casu _ { redde }\n\
                       }\n\
                       }";
        let (program, _errors) = analyze_source(source);

        let body = match &program.statements[1] {
            Stmt::FunctionDecl(decl) => &decl.body,
            other => panic!("expected a function decl, got {other:?}"),
        };
        let arms = match &body[0] {
            Stmt::Discerne { arms, .. } => arms,
            other => panic!("expected a discerne statement, got {other:?}"),
        };
        let click_arm_body = &arms[0].body;

        let ok_initializer = match &click_arm_body[0] {
            Stmt::VarDecl(decl) => decl.initializer.as_ref().unwrap(),
            other => panic!("expected a var decl, got {other:?}"),
        };
        assert_eq!(ok_initializer.resolved_type, Some(SemanticType::primitive(Primitive::Numerus, false)), "c.x on a Click-narrowed alias must resolve to the variant's own field type");

        let leak_initializer = match &click_arm_body[1] {
            Stmt::VarDecl(decl) => decl.initializer.as_ref().unwrap(),
            other => panic!("expected a var decl, got {other:?}"),
        };
        assert_eq!(
            leak_initializer.resolved_type,
            Some(SemanticType::Unknown),
            "c.reason belongs to the Quit variant only; a Click-narrowed alias must not find it"
        );
    }
}
