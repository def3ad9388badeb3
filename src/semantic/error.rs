//! Semantic error records, matching spec.md §7's `S`-prefixed taxonomy.

use crate::error::{ErrorEnvelope, IntoEnvelope};
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, position: Position },
    #[error("cannot reassign immutable binding '{name}'")]
    ImmutableReassignment { name: String, position: Position },
    #[error("type mismatch: value of type '{found}' is not assignable to '{expected}'")]
    TypeMismatch { expected: String, found: String, position: Position },
    #[error("module not found: '{path}'")]
    ModuleNotFound { path: String, position: Position },
    #[error("export '{name}' not found in module '{path}'")]
    ExportNotFound { name: String, path: String, position: Position },
    #[error("duplicate declaration of '{name}' in this scope")]
    DuplicateDeclaration { name: String, position: Position },
    #[error("unknown variant '{variant}' for discretio '{discretio}'")]
    UnknownVariant { discretio: String, variant: String, position: Position },
}

impl SemanticError {
    pub fn position(&self) -> Position {
        match self {
            SemanticError::UndefinedVariable { position, .. }
            | SemanticError::ImmutableReassignment { position, .. }
            | SemanticError::TypeMismatch { position, .. }
            | SemanticError::ModuleNotFound { position, .. }
            | SemanticError::ExportNotFound { position, .. }
            | SemanticError::DuplicateDeclaration { position, .. }
            | SemanticError::UnknownVariant { position, .. } => *position,
        }
    }
}

impl IntoEnvelope for SemanticError {
    fn into_envelope(self) -> ErrorEnvelope {
        let position = self.position();
        let (code, help) = match &self {
            SemanticError::UndefinedVariable { .. } => ("S001", "declare the variable before using it"),
            SemanticError::ImmutableReassignment { .. } => ("S002", "declare the binding with 'varia' to allow reassignment"),
            SemanticError::TypeMismatch { .. } => ("S003", "the value's type is not assignable"),
            SemanticError::ModuleNotFound { .. } => ("S004", "check the import path"),
            SemanticError::ExportNotFound { .. } => ("S005", "check the imported module's exports"),
            SemanticError::DuplicateDeclaration { .. } => ("S006", "the first declaration wins; rename this one"),
            SemanticError::UnknownVariant { .. } => ("S007", "check the discretio's declared variants"),
        };
        ErrorEnvelope { code, text: self.to_string(), help: help.to_string(), position, range: position.offset..position.offset + 1 }
    }
}
