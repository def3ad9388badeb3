//! Parse error records, matching spec.md §7's `P`-prefixed taxonomy.

use crate::error::{ErrorEnvelope, IntoEnvelope};
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String, position: Position },
    #[error("expected a statement, found {found}")]
    ExpectedStatement { found: String, position: Position },
    #[error("expected an expression, found {found}")]
    ExpectedExpression { found: String, position: Position },
    #[error("bare '{keyword}' declaration needs a type or an initializer")]
    BareDeclaration { keyword: String, position: Position },
    #[error("conflicting function modifiers: '{verb}' already implies {implied}")]
    ConflictingModifier { verb: String, implied: String, position: Position },
    #[error("type parameter '{name}' must precede normal parameters")]
    TypeParamAfterValueParam { name: String, position: Position },
    #[error("unexpected end of input while parsing {context}")]
    UnexpectedEof { context: String, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::ExpectedStatement { position, .. }
            | ParseError::ExpectedExpression { position, .. }
            | ParseError::BareDeclaration { position, .. }
            | ParseError::ConflictingModifier { position, .. }
            | ParseError::TypeParamAfterValueParam { position, .. }
            | ParseError::UnexpectedEof { position, .. } => *position,
        }
    }
}

impl IntoEnvelope for ParseError {
    fn into_envelope(self) -> ErrorEnvelope {
        let position = self.position();
        let (code, help) = match &self {
            ParseError::UnexpectedToken { .. } => ("P001", "check the surrounding syntax"),
            ParseError::ExpectedStatement { .. } => ("P002", "a statement was expected here"),
            ParseError::ExpectedExpression { .. } => ("P003", "an expression was expected here"),
            ParseError::BareDeclaration { .. } => ("P004", "add a type annotation or an initializer"),
            ParseError::ConflictingModifier { .. } => ("P005", "remove the redundant modifier"),
            ParseError::TypeParamAfterValueParam { .. } => ("P006", "move 'prae typus' parameters before value parameters"),
            ParseError::UnexpectedEof { .. } => ("P007", "the input ended before this construct was closed"),
        };
        ErrorEnvelope { code, text: self.to_string(), help: help.to_string(), position, range: position.offset..position.offset + 1 }
    }
}
