//! Operator and delimiter recognition: longest-match lookahead.
//!
//! Spec.md §4.2: "Notable multi-character tokens: `===`, `!==`, `==`,
//! `!=`, `<=`, `>=`, `&&`, `||`, `=>`, `->`, `..`. Single `&` is invalid
//! (error but continue). `|` is either `||` or a pipe (used for union
//! types)." The table below is ordered longest-prefix-first so a greedy
//! scan never stops one character short of a legal multi-character token.

use nom::Slice;

use super::error::LexError;
use crate::nom_tools::NomSpan;
use crate::position::Position;
use crate::token::{Operator, Token, TokenKind};

const MULTI_CHAR: &[(&str, Operator)] = &[
    ("===", Operator::EqEqEq),
    ("!==", Operator::NotEqEq),
    ("==", Operator::Eq),
    ("!=", Operator::NotEq),
    ("<=", Operator::LtEq),
    (">=", Operator::GtEq),
    ("&&", Operator::AndAnd),
    ("||", Operator::OrOr),
    ("=>", Operator::FatArrow),
    ("->", Operator::Arrow),
    ("..", Operator::DotDot),
    ("?.", Operator::QuestionDot),
    ("!.", Operator::BangDot),
];

const SINGLE_CHAR: &[(char, Operator)] = &[
    ('+', Operator::Plus),
    ('-', Operator::Minus),
    ('*', Operator::Star),
    ('/', Operator::Slash),
    ('%', Operator::Percent),
    ('=', Operator::Assign),
    ('<', Operator::Lt),
    ('>', Operator::Gt),
    ('|', Operator::Pipe),
    ('^', Operator::Caret),
    ('.', Operator::Dot),
    ('?', Operator::Question),
    ('!', Operator::Bang),
    (':', Operator::Colon),
    (',', Operator::Comma),
    (';', Operator::Semicolon),
    ('(', Operator::LParen),
    (')', Operator::RParen),
    ('{', Operator::LBrace),
    ('}', Operator::RBrace),
    ('[', Operator::LBracket),
    (']', Operator::RBracket),
];

pub fn scan<'a>(input: NomSpan<'a>, start: Position) -> Option<(NomSpan<'a>, Result<Token, LexError>)> {
    let fragment = *input.fragment();

    for (lexeme, op) in MULTI_CHAR {
        if fragment.starts_with(lexeme) {
            return Some((input.slice(lexeme.len()..), Ok(Token::new(TokenKind::Operator(*op), *lexeme, start))));
        }
    }

    let first = fragment.chars().next()?;

    // A bare `&` (not part of `&&`) is explicitly invalid per spec.md §4.2;
    // report it and let the caller's recovery loop skip past it, rather
    // than emitting a token no grammar production accepts.
    if first == '&' {
        return Some((input.slice(1..), Err(LexError::InvalidAmpersand { position: start })));
    }

    for (ch, op) in SINGLE_CHAR {
        if first == *ch {
            let len = first.len_utf8();
            return Some((input.slice(len..), Ok(Token::new(TokenKind::Operator(*op), &fragment[..len], start))));
        }
    }

    None
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
    fn triple_equals_beats_double_and_single() {
        let input = span("===x");
        let start = span_start(&input);
        let (rest, result) = scan(input, start).unwrap();
        assert_eq!(result.unwrap().text, "===");
        assert_eq!(*rest.fragment(), "x");
    }

    #[test]
    fn bare_ampersand_is_invalid() {
        let input = span("& rest");
        let start = span_start(&input);
        let (_, result) = scan(input, start).unwrap();
        assert!(matches!(result.unwrap_err(), LexError::InvalidAmpersand { .. }));
    }

    #[test]
    fn bare_pipe_is_a_valid_single_token() {
        let input = span("|x");
        let start = span_start(&input);
        let (_, result) = scan(input, start).unwrap();
        assert_eq!(result.unwrap().kind, TokenKind::Operator(Operator::Pipe));
    }
}
