//! The lexical scope stack: a `Vec<Scope>` with enter/leave, grounded on
//! `libtimu::tir::scope`'s scope-tree design but flattened to a plain
//! stack since this analyzer walks the AST depth-first and never needs
//! random access back into a sibling scope once it's closed.

use indexmap::IndexMap;

use crate::position::Position;
use crate::semantic::types::SemanticType;

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: SemanticType,
    pub mutable: bool,
    pub declared_at: Position,
    /// Set for a `discerne … ut name` alias binding: the name of the
    /// discretio variant it was matched against, so member access on it
    /// can be scoped to that variant's fields alone (spec.md §4.4).
    pub narrowed_variant: Option<String>,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: IndexMap<String, Binding>,
}

/// A stack of lexical scopes. The outermost scope (index 0) is the module
/// scope; pushing enters a block, popping leaves it (spec.md §4.4: "a
/// variable declared in an inner block is not visible after that block").
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::default()] }
    }

    pub fn enter(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn leave(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "the module scope is never popped");
    }

    /// Declares `name` in the innermost scope. Returns `false` (and leaves
    /// the existing binding in place) if `name` already exists in that same
    /// scope — spec.md §4.4: "duplicate names in the same scope are
    /// errors".
    pub fn declare(&mut self, name: &str, ty: SemanticType, mutable: bool, declared_at: Position) -> bool {
        let scope = self.scopes.last_mut().expect("at least the module scope");
        if scope.bindings.contains_key(name) {
            return false;
        }
        scope.bindings.insert(name.to_string(), Binding { ty, mutable, declared_at, narrowed_variant: None });
        true
    }

    /// Looks up `name` starting from the innermost scope outward — spec.md
    /// §3: "symbol lookup yields the innermost matching binding".
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.bindings.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.bindings.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::types::Primitive;

    fn num() -> SemanticType {
        SemanticType::primitive(Primitive::Numerus, false)
    }

    #[test]
    fn inner_declaration_invisible_after_block_ends() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.declare("x", num(), true, Position::START);
        assert!(scopes.lookup("x").is_some());
        scopes.leave();
        assert!(scopes.lookup("x").is_none());
    }

    #[test]
    fn shadowing_in_inner_block_does_not_alter_outer_binding() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", num(), false, Position::START);
        scopes.enter();
        scopes.declare("x", num(), true, Position::START);
        assert!(scopes.lookup("x").unwrap().mutable);
        scopes.leave();
        assert!(!scopes.lookup("x").unwrap().mutable);
    }

    #[test]
    fn duplicate_declaration_in_same_scope_is_rejected() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.declare("x", num(), false, Position::START));
        assert!(!scopes.declare("x", num(), true, Position::START));
    }

    #[test]
    fn innermost_binding_wins_on_lookup() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", num(), false, Position::START);
        scopes.enter();
        scopes.declare("x", SemanticType::primitive(Primitive::Textus, false), true, Position::START);
        assert_eq!(scopes.lookup("x").unwrap().ty, SemanticType::primitive(Primitive::Textus, false));
    }
}
