//! String and template-string literal recognition.
//!
//! Spec.md §4.2: single/double-quoted strings support `\n \t \r \\ \" \'`
//! escapes (unknown escapes pass through verbatim); a newline before the
//! closing quote is an error. Template strings are backtick-delimited, may
//! contain newlines, and track `${...}` interpolation brace depth so a
//! `{` inside an interpolated expression doesn't prematurely end the
//! template.

use nom::Slice;

use super::error::LexError;
use crate::nom_tools::NomSpan;
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Scans a `"..."` or `'...'` string literal starting at the current
/// input. Returns `None` if the input doesn't start with a quote at all;
/// otherwise always consumes at least the opening quote, reporting
/// [`LexError::UnterminatedString`] if no matching close is found before a
/// newline or end of input.
pub fn scan_string<'a>(input: NomSpan<'a>, start: Position) -> Option<(NomSpan<'a>, Result<Token, LexError>)> {
    let fragment = *input.fragment();
    let quote = fragment.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }

    let body = &fragment[quote.len_utf8()..];
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            // Unknown escapes pass through; we just skip the escaped char
            // so `\"` inside the literal doesn't terminate it early.
            chars.next();
            continue;
        }

        if c == '\n' {
            let text = &fragment[..quote.len_utf8() + i];
            return Some((input.slice(text.len()..), Err(LexError::UnterminatedString { text: text.to_string(), position: start })));
        }

        if c == quote {
            let total_len = quote.len_utf8() + i + c.len_utf8();
            let text = &fragment[..total_len];
            return Some((input.slice(total_len..), Ok(Token::new(TokenKind::Str, text, start))));
        }
    }

    let text = fragment.to_string();
    Some((input.slice(fragment.len()..), Err(LexError::UnterminatedString { text, position: start })))
}

/// Scans a backtick-delimited template string, tracking `${ ... }` brace
/// depth so nested braces inside an interpolated expression don't close the
/// template early. The whole template — delimiters, literal text and
/// interpolations — is kept as one token's text (spec.md §4.2: "captured
/// as part of the token string").
pub fn scan_template<'a>(input: NomSpan<'a>, start: Position) -> Option<(NomSpan<'a>, Result<Token, LexError>)> {
    let fragment = *input.fragment();
    if !fragment.starts_with('`') {
        return None;
    }

    let bytes = fragment.as_bytes();
    let mut i = 1usize;
    let mut interpolation_depth = 0u32;

    while i < bytes.len() {
        let c = fragment[i..].chars().next().unwrap();

        if c == '\\' {
            i += c.len_utf8();
            if i < bytes.len() {
                i += fragment[i..].chars().next().unwrap().len_utf8();
            }
            continue;
        }

        if interpolation_depth == 0 && c == '`' {
            let total_len = i + c.len_utf8();
            let text = &fragment[..total_len];
            return Some((input.slice(total_len..), Ok(Token::new(TokenKind::TemplateStr, text, start))));
        }

        if interpolation_depth == 0 && fragment[i..].starts_with("${") {
            interpolation_depth = 1;
            i += 2;
            continue;
        }

        if interpolation_depth > 0 {
            if c == '{' {
                interpolation_depth += 1;
            } else if c == '}' {
                interpolation_depth -= 1;
            }
        }

        i += c.len_utf8();
    }

    let text = fragment.to_string();
    Some((input.slice(fragment.len()..), Err(LexError::UnterminatedString { text, position: start })))
}

/// Decodes a scanned string token's source slice (quotes included) into its
/// value: strips the surrounding quotes and resolves the escapes spec.md
/// §4.2 names, passing any unrecognized `\x` through as the literal `x`.
pub fn decode_string_literal(text: &str) -> String {
    let body = &text[1..text.len().saturating_sub(1).max(1)];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
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
    fn simple_double_quoted_string() {
        let input = span("\"hello\" rest");
        let start = span_start(&input);
        let (_, result) = scan_string(input, start).unwrap();
        assert_eq!(result.unwrap().text, "\"hello\"");
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        let input = span("\"a\\\"b\"");
        let start = span_start(&input);
        let (_, result) = scan_string(input, start).unwrap();
        assert_eq!(result.unwrap().text, "\"a\\\"b\"");
    }

    #[test]
    fn newline_before_close_is_an_error() {
        let input = span("\"unterminated\n");
        let start = span_start(&input);
        let (_, result) = scan_string(input, start).unwrap();
        assert!(matches!(result.unwrap_err(), LexError::UnterminatedString { .. }));
    }

    #[test]
    fn template_with_nested_braces_in_interpolation() {
        let input = span("`a ${ { x: 1 } } b`");
        let start = span_start(&input);
        let (_, result) = scan_template(input, start).unwrap();
        assert_eq!(result.unwrap().text, "`a ${ { x: 1 } } b`");
    }
}
