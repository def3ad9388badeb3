//! Type-annotation parsing: `lista<numerus>`, `Genus | Pactum`, `numerus?`.

use crate::ast::TypeExpr;
use crate::parser::Parser;
use crate::token::Operator;

impl<'t> Parser<'t> {
    /// `union_type '?'?` — a trailing `?` nullable marker wraps the whole
    /// union (spec.md §4.3's precedence ladder treats nullability as
    /// outermost).
    pub(super) fn parse_type_expr(&mut self) -> Option<TypeExpr> {
        let inner = self.parse_union_type()?;
        if self.match_operator(Operator::Question) {
            Some(TypeExpr::Nullable(Box::new(inner)))
        } else {
            Some(inner)
        }
    }

    /// `named_type ('|' named_type)*`.
    fn parse_union_type(&mut self) -> Option<TypeExpr> {
        let mut members = vec![self.parse_named_type()?];
        while self.match_operator(Operator::Pipe) {
            members.push(self.parse_named_type()?);
        }
        if members.len() == 1 { Some(members.pop().unwrap()) } else { Some(TypeExpr::Union(members)) }
    }

    /// `IDENT ('<' type_expr (',' type_expr)* '>')?`.
    fn parse_named_type(&mut self) -> Option<TypeExpr> {
        let ident = self.expect_identifier("as a type name")?;
        let mut args = Vec::new();
        if self.match_operator(Operator::Lt) {
            loop {
                args.push(self.parse_type_expr()?);
                if !self.match_operator(Operator::Comma) {
                    break;
                }
            }
            self.expect_operator(Operator::Gt, "to close the generic argument list")?;
        }
        Some(TypeExpr::Named { name: ident.name, args, position: ident.position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;
    use crate::token::Token;

    fn tokens_for(source: &str) -> Vec<Token> {
        let file = SourceFile::in_memory(source);
        crate::tokenizer::tokenize(&file).0
    }

    #[test]
    fn parses_plain_primitive_type() {
        let tokens = tokens_for("numerus");
        let mut parser = Parser::new(&tokens);
        let ty = parser.parse_type_expr().unwrap();
        assert_eq!(ty, TypeExpr::Named { name: "numerus".into(), args: vec![], position: ty.position() });
    }

    #[test]
    fn parses_generic_type_with_one_argument() {
        let tokens = tokens_for("lista<numerus>");
        let mut parser = Parser::new(&tokens);
        match parser.parse_type_expr().unwrap() {
            TypeExpr::Named { name, args, .. } => {
                assert_eq!(name, "lista");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Named, got {other:?}"),
        }
    }

    #[test]
    fn parses_union_type() {
        let tokens = tokens_for("numerus | textus");
        let mut parser = Parser::new(&tokens);
        match parser.parse_type_expr().unwrap() {
            TypeExpr::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected Union, got {other:?}"),
        }
    }

    #[test]
    fn parses_nullable_marker() {
        let tokens = tokens_for("numerus?");
        let mut parser = Parser::new(&tokens);
        assert!(matches!(parser.parse_type_expr().unwrap(), TypeExpr::Nullable(_)));
    }
}
