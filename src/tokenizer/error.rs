//! Lexical error records, matching spec.md §7's `L`-prefixed taxonomy.

use crate::error::{ErrorEnvelope, IntoEnvelope};
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string or template literal")]
    UnterminatedString { text: String, position: Position },
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, position: Position },
    #[error("'&' is not a valid operator on its own")]
    InvalidAmpersand { position: Position },
    #[error("invalid hex literal")]
    InvalidHexLiteral { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position, .. }
            | LexError::UnexpectedChar { position, .. }
            | LexError::InvalidAmpersand { position }
            | LexError::InvalidHexLiteral { position, .. } => *position,
        }
    }
}

impl IntoEnvelope for LexError {
    fn into_envelope(self) -> ErrorEnvelope {
        let position = self.position();
        let len = match &self {
            LexError::UnterminatedString { text, .. } => text.len().max(1),
            LexError::InvalidHexLiteral { text, .. } => text.len().max(1),
            LexError::UnexpectedChar { ch, .. } => ch.len_utf8(),
            LexError::InvalidAmpersand { .. } => 1,
        };
        let (code, help) = match &self {
            LexError::UnterminatedString { .. } => ("L001", "close the string with a matching quote"),
            LexError::UnexpectedChar { .. } => ("L002", "remove or replace the unrecognized character"),
            LexError::InvalidAmpersand { .. } => ("L003", "use '&&' for logical and"),
            LexError::InvalidHexLiteral { .. } => ("L004", "hex literals need at least one digit after '0x'"),
        };
        ErrorEnvelope {
            code,
            text: self.to_string(),
            help: help.to_string(),
            position,
            range: position.offset..position.offset + len,
        }
    }
}
