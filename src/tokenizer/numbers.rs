//! Number literal recognition: decimal, hex, and the `n` bigint suffix.
//!
//! Spec.md §4.2: "decimal (`digits ('.' digits)?`), hex (`0x hex+`),
//! optional `n` suffix promotes to bigint. Leading-zero decimals are
//! preserved verbatim." Numbers never fail to scan once the leading digit
//! is seen — an incomplete literal like a bare `0x` with no hex digits
//! simply stops at the longest valid prefix, matching nom's usual
//! `opt`/`many0` greediness.

use nom::Slice;

use super::error::LexError;
use crate::nom_tools::NomSpan;
use crate::position::Position;
use crate::token::{Token, TokenKind};

pub fn scan<'a>(input: NomSpan<'a>, start: Position) -> Option<(NomSpan<'a>, Result<Token, LexError>)> {
    let fragment = *input.fragment();
    let mut chars = fragment.chars();
    let first = chars.next()?;
    if !first.is_ascii_digit() {
        return None;
    }

    if first == '0' && matches!(chars.next(), Some('x') | Some('X')) {
        let hex_len: usize = chars.clone().take_while(|c| c.is_ascii_hexdigit()).count();
        if hex_len == 0 {
            let text = &fragment[..2];
            return Some((input.slice(2..), Err(LexError::InvalidHexLiteral { text: text.to_string(), position: start })));
        }

        let mut len = 2 + hex_len;
        let mut kind = TokenKind::Number;
        if fragment[len..].starts_with('n') {
            len += 1;
            kind = TokenKind::BigInt;
        }
        let text = &fragment[..len];
        return Some((input.slice(len..), Ok(Token::new(kind, text, start))));
    }

    let mut len = fragment.chars().take_while(|c| c.is_ascii_digit()).count();
    let after_int = &fragment[len..];
    if let Some(rest) = after_int.strip_prefix('.') {
        let frac_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if frac_len > 0 {
            len += 1 + frac_len;
        }
    }

    let mut kind = TokenKind::Number;
    if fragment[len..].starts_with('n') {
        len += 1;
        kind = TokenKind::BigInt;
    }

    let text = &fragment[..len];
    Some((input.slice(len..), Ok(Token::new(kind, text, start))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;
    use crate::nom_tools::{span_start, State};

    fn span(source: &'static str) -> NomSpan<'static> {
        NomSpan::new_extra(source, State::new(SourceFile::in_memory(source)))
    }

    #[test]
    fn decimal_with_fraction() {
        let input = span("3.14 rest");
        let start = span_start(&input);
        let (rest, token) = scan(input, start).unwrap();
        let token = token.unwrap();
        assert_eq!(token.text, "3.14");
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(*rest.fragment(), " rest");
    }

    #[test]
    fn leading_zero_is_preserved_verbatim() {
        let input = span("007");
        let start = span_start(&input);
        let (_, token) = scan(input, start).unwrap();
        assert_eq!(token.unwrap().text, "007");
    }

    #[test]
    fn hex_promotes_to_bigint_with_n_suffix() {
        let input = span("0xFFn");
        let start = span_start(&input);
        let (_, token) = scan(input, start).unwrap();
        let token = token.unwrap();
        assert_eq!(token.kind, TokenKind::BigInt);
        assert_eq!(token.text, "0xFFn");
    }

    #[test]
    fn bare_0x_with_no_hex_digits_is_an_error() {
        let input = span("0x");
        let start = span_start(&input);
        let (_, result) = scan(input, start).unwrap();
        assert!(matches!(result.unwrap_err(), LexError::InvalidHexLiteral { .. }));
    }

    #[test]
    fn non_digit_does_not_match() {
        let input = span("abc");
        let start = span_start(&input);
        assert!(scan(input, start).is_none());
    }
}
