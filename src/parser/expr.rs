//! Pratt-style expression parsing over the precedence ladder in spec.md
//! §4.3: assignment, conditional ternary, logical-or, logical-and,
//! bitwise-or, bitwise-xor, bitwise-and, equality, comparison, shift,
//! range, additive, multiplicative, cast, unary, call/member, primary.
//!
//! Two levels the ladder names have no corresponding lexical operator:
//! bitwise-and (a bare `&` is itself a lexical error — spec.md §4.2) and
//! shift (no shift operator token is defined anywhere in the surface
//! grammar). [`BinaryOp::BitAnd`] stays in the AST for structural
//! completeness, but nothing in this parser ever produces it; the climb
//! from bitwise-xor falls straight through to equality.

use crate::ast::{BinaryOp, ExprKind, ExprNode, FieldInit, FunctionModifiers, UnaryOp};
use crate::lexicon::Keyword;
use crate::parser::Parser;
use crate::token::{Operator, TokenKind};

impl<'t> Parser<'t> {
    pub(super) fn parse_expression(&mut self) -> Option<ExprNode> {
        self.parse_assignment()
    }

    /// Right-associative: `a = b = c` groups as `a = (b = c)`.
    fn parse_assignment(&mut self) -> Option<ExprNode> {
        let position = self.peek().position;
        let target = self.parse_ternary()?;
        if self.match_operator(Operator::Assign) {
            let value = self.parse_assignment()?;
            return Some(ExprNode::new(ExprKind::Assignment { target: Box::new(target), value: Box::new(value) }, position));
        }
        Some(target)
    }

    /// `condition sic then secus else`.
    fn parse_ternary(&mut self) -> Option<ExprNode> {
        let position = self.peek().position;
        let condition = self.parse_logical_or()?;
        if self.match_keyword(Keyword::Sic) {
            let then_branch = self.parse_ternary()?;
            self.expect_keyword(Keyword::Secus, "to introduce the ternary's else branch");
            let else_branch = self.parse_ternary()?;
            return Some(ExprNode::new(
                ExprKind::Conditional { condition: Box::new(condition), then_branch: Box::new(then_branch), else_branch: Box::new(else_branch) },
                position,
            ));
        }
        Some(condition)
    }

    fn parse_logical_or(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_logical_and()?;
        while self.check_keyword(Keyword::Aut) {
            let position = self.advance().position;
            let right = self.parse_logical_and()?;
            left = ExprNode::new(ExprKind::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_logical_and(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_bitwise_or()?;
        while self.check_keyword(Keyword::Et) {
            let position = self.advance().position;
            let right = self.parse_bitwise_or()?;
            left = ExprNode::new(ExprKind::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_bitwise_or(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_bitwise_xor()?;
        while self.check_operator(Operator::Pipe) {
            let position = self.advance().position;
            let right = self.parse_bitwise_xor()?;
            left = ExprNode::new(ExprKind::Binary { op: BinaryOp::BitOr, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_bitwise_xor(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_equality()?;
        while self.check_operator(Operator::Caret) {
            let position = self.advance().position;
            let right = self.parse_equality()?;
            left = ExprNode::new(ExprKind::Binary { op: BinaryOp::BitXor, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_equality(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = if self.check_operator(Operator::Eq) {
                BinaryOp::Eq
            } else if self.check_operator(Operator::EqEqEq) {
                BinaryOp::StrictEq
            } else if self.check_operator(Operator::NotEq) {
                BinaryOp::NotEq
            } else if self.check_operator(Operator::NotEqEq) {
                BinaryOp::StrictNotEq
            } else {
                break;
            };
            let position = self.advance().position;
            let right = self.parse_comparison()?;
            left = ExprNode::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_comparison(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_range()?;
        loop {
            let op = if self.check_operator(Operator::Lt) {
                BinaryOp::Lt
            } else if self.check_operator(Operator::LtEq) {
                BinaryOp::LtEq
            } else if self.check_operator(Operator::Gt) {
                BinaryOp::Gt
            } else if self.check_operator(Operator::GtEq) {
                BinaryOp::GtEq
            } else {
                break;
            };
            let position = self.advance().position;
            let right = self.parse_range()?;
            left = ExprNode::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    /// `start..end` (exclusive) or `start..usque end` (inclusive).
    fn parse_range(&mut self) -> Option<ExprNode> {
        let start = self.parse_additive()?;
        if self.check_operator(Operator::DotDot) {
            let position = self.advance().position;
            let inclusive = self.match_keyword(Keyword::Usque);
            let end = self.parse_additive()?;
            return Some(ExprNode::new(ExprKind::Range { start: Box::new(start), end: Box::new(end), inclusive }, position));
        }
        Some(start)
    }

    fn parse_additive(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.check_operator(Operator::Plus) {
                BinaryOp::Add
            } else if self.check_operator(Operator::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let position = self.advance().position;
            let right = self.parse_multiplicative()?;
            left = ExprNode::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    fn parse_multiplicative(&mut self) -> Option<ExprNode> {
        let mut left = self.parse_cast()?;
        loop {
            let op = if self.check_operator(Operator::Star) {
                BinaryOp::Mul
            } else if self.check_operator(Operator::Slash) {
                BinaryOp::Div
            } else if self.check_operator(Operator::Percent) {
                BinaryOp::Rem
            } else {
                break;
            };
            let position = self.advance().position;
            let right = self.parse_cast()?;
            left = ExprNode::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, position);
        }
        Some(left)
    }

    /// `expr qua Type`, left-associative so `a qua Foo qua Bar` re-casts.
    fn parse_cast(&mut self) -> Option<ExprNode> {
        let mut expr = self.parse_unary()?;
        while self.check_keyword(Keyword::Qua) {
            let position = self.advance().position;
            let target = self.parse_type_expr()?;
            expr = ExprNode::new(ExprKind::Qua { value: Box::new(expr), target }, position);
        }
        Some(expr)
    }

    fn parse_unary(&mut self) -> Option<ExprNode> {
        if self.check_operator(Operator::Minus) {
            let position = self.advance().position;
            let operand = self.parse_unary()?;
            return Some(ExprNode::new(ExprKind::Unary { op: UnaryOp::Neg, operand: Box::new(operand) }, position));
        }
        if self.check_keyword(Keyword::Non) {
            let position = self.advance().position;
            let operand = self.parse_unary()?;
            return Some(ExprNode::new(ExprKind::Unary { op: UnaryOp::Not, operand: Box::new(operand) }, position));
        }
        if self.check_keyword(Keyword::Nulla) {
            let position = self.advance().position;
            let operand = self.parse_unary()?;
            return Some(ExprNode::new(ExprKind::Unary { op: UnaryOp::IsNull, operand: Box::new(operand) }, position));
        }
        if self.check_keyword(Keyword::Nonnulla) {
            let position = self.advance().position;
            let operand = self.parse_unary()?;
            return Some(ExprNode::new(ExprKind::Unary { op: UnaryOp::IsNotNull, operand: Box::new(operand) }, position));
        }
        self.parse_call_or_member()
    }

    fn parse_call_or_member(&mut self) -> Option<ExprNode> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check_operator(Operator::LParen) {
                let position = self.advance().position;
                let mut args = Vec::new();
                while !self.check_operator(Operator::RParen) && !self.at_eof() {
                    args.push(self.parse_expression()?);
                    if !self.match_operator(Operator::Comma) {
                        break;
                    }
                }
                self.expect_operator(Operator::RParen, "to close the call's argument list");
                expr = ExprNode::new(ExprKind::Call { callee: Box::new(expr), type_args: Vec::new(), args }, position);
                continue;
            }
            if self.check_operator(Operator::Dot) {
                let position = self.advance().position;
                let property = self.expect_identifier("after '.'")?.name;
                expr = ExprNode::new(ExprKind::Member { object: Box::new(expr), property, kind: crate::ast::MemberAccessKind::Direct }, position);
                continue;
            }
            if self.check_operator(Operator::QuestionDot) {
                let position = self.advance().position;
                let property = self.expect_identifier("after '?.'")?.name;
                expr = ExprNode::new(ExprKind::Member { object: Box::new(expr), property, kind: crate::ast::MemberAccessKind::OptionalChaining }, position);
                continue;
            }
            if self.check_operator(Operator::BangDot) {
                let position = self.advance().position;
                let property = self.expect_identifier("after '!.'")?.name;
                expr = ExprNode::new(ExprKind::Member { object: Box::new(expr), property, kind: crate::ast::MemberAccessKind::NonNullAssertion }, position);
                continue;
            }
            if self.check_operator(Operator::LBracket) {
                let position = self.advance().position;
                let index = self.parse_expression()?;
                self.expect_operator(Operator::RBracket, "to close the index expression");
                expr = ExprNode::new(ExprKind::Index { object: Box::new(expr), index: Box::new(index) }, position);
                continue;
            }
            break;
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<ExprNode> {
        let token = self.peek();
        let position = token.position;
        match &token.kind {
            TokenKind::Number => {
                let text = self.advance().text.clone();
                Some(ExprNode::new(ExprKind::NumberLiteral(text), position))
            }
            TokenKind::BigInt => {
                let text = self.advance().text.clone();
                Some(ExprNode::new(ExprKind::BigIntLiteral(text), position))
            }
            TokenKind::Str => {
                let text = self.advance().text.clone();
                Some(ExprNode::new(ExprKind::StringLiteral(crate::tokenizer::decode_string_literal(&text)), position))
            }
            TokenKind::TemplateStr => {
                let text = self.advance().text.clone();
                Some(ExprNode::new(ExprKind::TemplateLiteral(text), position))
            }
            TokenKind::Keyword(Keyword::Verum) => {
                self.advance();
                Some(ExprNode::new(ExprKind::BoolLiteral(true), position))
            }
            TokenKind::Keyword(Keyword::Falsum) => {
                self.advance();
                Some(ExprNode::new(ExprKind::BoolLiteral(false), position))
            }
            TokenKind::Keyword(Keyword::Nihil) => {
                self.advance();
                Some(ExprNode::new(ExprKind::NihilLiteral, position))
            }
            TokenKind::Keyword(Keyword::Vacuum) => {
                self.advance();
                Some(ExprNode::new(ExprKind::VacuumLiteral, position))
            }
            TokenKind::Keyword(Keyword::Novum) => {
                self.advance();
                let type_name = self.parse_type_expr()?;
                let fields = self.parse_field_inits()?;
                Some(ExprNode::new(ExprKind::Novum { type_name, fields }, position))
            }
            TokenKind::Keyword(Keyword::Finge) => {
                self.advance();
                let variant = self.expect_identifier("as the variant name")?.name;
                let fields = self.parse_field_inits()?;
                Some(ExprNode::new(ExprKind::Finge { variant, fields }, position))
            }
            TokenKind::Operator(Operator::LParen) => {
                if self.looks_like_lambda_params() {
                    self.parse_lambda()
                } else {
                    self.advance();
                    let inner = self.parse_expression()?;
                    self.expect_operator(Operator::RParen, "to close the parenthesized expression");
                    Some(inner)
                }
            }
            TokenKind::Identifier => {
                let text = self.advance().text.clone();
                Some(ExprNode::new(ExprKind::Identifier(text), position))
            }
            _ => {
                let found = Self::describe(token);
                self.errors.push(crate::parser::ParseError::ExpectedExpression { found, position });
                None
            }
        }
    }

    /// `{ name: expr, ... }`, used by both `novum` construction and `finge`
    /// variant construction.
    fn parse_field_inits(&mut self) -> Option<Vec<FieldInit>> {
        self.expect_operator(Operator::LBrace, "to open the field initializer list")?;
        let mut fields = Vec::new();
        while !self.check_operator(Operator::RBrace) && !self.at_eof() {
            let name = self.expect_identifier("as a field name")?.name;
            self.expect_operator(Operator::Colon, "after the field name")?;
            let value = self.parse_expression()?;
            fields.push(FieldInit { name, value });
            if !self.match_operator(Operator::Comma) {
                break;
            }
        }
        self.expect_operator(Operator::RBrace, "to close the field initializer list")?;
        Some(fields)
    }

    /// Lookahead over a balanced `(...)` to see whether it's followed by a
    /// return-arrow token, distinguishing a lambda from a parenthesized
    /// grouping expression.
    fn looks_like_lambda_params(&self) -> bool {
        let mut depth = 0i32;
        let mut offset = 0;
        loop {
            match &self.peek_at(offset).kind {
                TokenKind::Operator(Operator::LParen) => depth += 1,
                TokenKind::Operator(Operator::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        offset += 1;
                        break;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
        matches!(
            self.peek_at(offset).kind,
            TokenKind::Operator(Operator::Arrow)
                | TokenKind::Keyword(Keyword::Fit)
                | TokenKind::Keyword(Keyword::Fiet)
                | TokenKind::Keyword(Keyword::Fiunt)
                | TokenKind::Keyword(Keyword::Fient)
        )
    }

    /// `(params) -> expr` or `(params) -> { stmts }`; `fit`/`fiet`/`fiunt`/
    /// `fient` are equally valid verb-arrows, carrying the same
    /// async/generator semantics as named function declarations.
    fn parse_lambda(&mut self) -> Option<ExprNode> {
        let position = self.peek().position;
        let (_, params) = self.parse_param_list()?;
        let verb_token = self.advance();
        let (is_async, is_generator) = match &verb_token.kind {
            TokenKind::Operator(Operator::Arrow) => (false, false),
            TokenKind::Keyword(Keyword::Fit) => (false, false),
            TokenKind::Keyword(Keyword::Fiet) => (true, false),
            TokenKind::Keyword(Keyword::Fiunt) => (false, true),
            TokenKind::Keyword(Keyword::Fient) => (true, true),
            _ => {
                self.errors.push(crate::parser::ParseError::UnexpectedToken {
                    expected: "'->', 'fit', 'fiet', 'fiunt' or 'fient'".to_string(),
                    found: Self::describe(verb_token),
                    position: verb_token.position,
                });
                return None;
            }
        };
        let body = if self.check_operator(Operator::LBrace) {
            self.parse_block()
        } else {
            let value = self.parse_expression()?;
            let value_position = value.position;
            vec![crate::ast::Stmt::Return { value: Some(value), position: value_position }]
        };
        Some(ExprNode::new(ExprKind::Lambda { params, body, modifiers: FunctionModifiers { is_async, is_generator } }, position))
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

    fn expr_of(source: &str) -> ExprNode {
        let tokens = tokens_for(source);
        let mut parser = Parser::new(&tokens);
        let expr = parser.parse_expression().expect("expression");
        assert!(parser.errors.is_empty(), "{:?}", parser.errors);
        expr
    }

    #[test]
    fn additive_is_left_associative() {
        match expr_of("1 + 2 - 3").kind {
            ExprKind::Binary { op: BinaryOp::Sub, left, .. } => assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Add, .. })),
            other => panic!("expected Sub at top, got {other:?}"),
        }
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        match expr_of("1 + 2 * 3").kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. })),
            other => panic!("expected Add at top, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match expr_of("a = b = 1").kind {
            ExprKind::Assignment { value, .. } => assert!(matches!(value.kind, ExprKind::Assignment { .. })),
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn ternary_conditional() {
        match expr_of("x sic 1 secus 2").kind {
            ExprKind::Conditional { .. } => {}
            other => panic!("expected Conditional, got {other:?}"),
        }
    }

    #[test]
    fn range_with_usque_is_inclusive() {
        match expr_of("1..usque 10").kind {
            ExprKind::Range { inclusive, .. } => assert!(inclusive),
            other => panic!("expected Range, got {other:?}"),
        }
    }

    #[test]
    fn range_without_usque_is_exclusive() {
        match expr_of("1..10").kind {
            ExprKind::Range { inclusive, .. } => assert!(!inclusive),
            other => panic!("expected Range, got {other:?}"),
        }
    }

    #[test]
    fn call_and_member_chain() {
        match expr_of("a.b(1, 2).c").kind {
            ExprKind::Member { object, .. } => assert!(matches!(object.kind, ExprKind::Call { .. })),
            other => panic!("expected Member, got {other:?}"),
        }
    }

    #[test]
    fn optional_chaining_member() {
        match expr_of("a?.b").kind {
            ExprKind::Member { kind: crate::ast::MemberAccessKind::OptionalChaining, .. } => {}
            other => panic!("expected OptionalChaining Member, got {other:?}"),
        }
    }

    #[test]
    fn novum_construction_with_fields() {
        match expr_of("novum Punctum { x: 1, y: 2 }").kind {
            ExprKind::Novum { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("expected Novum, got {other:?}"),
        }
    }

    #[test]
    fn finge_variant_constructor() {
        match expr_of("finge Click { x: 1, y: 2 }").kind {
            ExprKind::Finge { variant, fields } => {
                assert_eq!(variant, "Click");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected Finge, got {other:?}"),
        }
    }

    #[test]
    fn cast_expression() {
        match expr_of("x qua numerus").kind {
            ExprKind::Qua { .. } => {}
            other => panic!("expected Qua, got {other:?}"),
        }
    }

    #[test]
    fn lambda_with_expression_body() {
        match expr_of("(x) -> x").kind {
            ExprKind::Lambda { body, .. } => assert_eq!(body.len(), 1),
            other => panic!("expected Lambda, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_grouping_is_not_confused_with_lambda() {
        match expr_of("(1 + 2) * 3").kind {
            ExprKind::Binary { op: BinaryOp::Mul, .. } => {}
            other => panic!("expected Mul, got {other:?}"),
        }
    }

    #[test]
    fn logical_and_binds_tighter_than_logical_or() {
        match expr_of("verum aut falsum et verum").kind {
            ExprKind::Binary { op: BinaryOp::Or, right, .. } => assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::And, .. })),
            other => panic!("expected Or at top, got {other:?}"),
        }
    }

    #[test]
    fn unary_not_and_null_checks() {
        assert!(matches!(expr_of("non verum").kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
        assert!(matches!(expr_of("nulla x").kind, ExprKind::Unary { op: UnaryOp::IsNull, .. }));
        assert!(matches!(expr_of("nonnulla x").kind, ExprKind::Unary { op: UnaryOp::IsNotNull, .. }));
    }
}
