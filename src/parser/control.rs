//! Control-flow and test-construct statements: conditionals, loops,
//! pattern matches, exception handling, scoped resources, and test
//! blocks (spec.md §4.3's "highlights of non-trivial constructs").

use crate::ast::{
    Conditional, ConditionalBranch, CuraBlock, CuraHook, CuraHookTiming, DeIteration, DiscerneArm, DiscerneBinding, EligeArm, ForIteration, InBlock, IterationForm, ProbaTest,
    ProbandumBlock, Stmt, TryCatch, WhileLoop,
};
use crate::lexicon::Keyword;
use crate::parser::{ParseError, Parser};
use crate::token::{Operator, TokenKind};

impl<'t> Parser<'t> {
    /// `si cond {body} (aliter si|sin cond {body})* (aliter|secus {body})?`.
    /// `aliter` and `secus` are interchangeable else-keywords, as are
    /// `aliter si` and `sin` for else-if — the two families may mix within
    /// one chain (spec.md §4.3).
    pub(super) fn parse_conditional(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let mut branches = Vec::new();

        let condition = self.parse_expression()?;
        let body = self.parse_branch_body()?;
        branches.push(ConditionalBranch { condition, body });

        let mut else_body = None;
        loop {
            if self.check_keyword(Keyword::Aliter) && matches!(self.peek_at(1).kind, TokenKind::Keyword(Keyword::Si)) {
                self.advance();
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_branch_body()?;
                branches.push(ConditionalBranch { condition, body });
            } else if self.match_keyword(Keyword::Sin) {
                let condition = self.parse_expression()?;
                let body = self.parse_branch_body()?;
                branches.push(ConditionalBranch { condition, body });
            } else if self.match_keyword(Keyword::Aliter) || self.match_keyword(Keyword::Secus) {
                else_body = Some(self.parse_branch_body()?);
                break;
            } else {
                break;
            }
        }

        Some(Stmt::Conditional(Conditional { branches, else_body, position }))
    }

    /// A braced block, or the `ergo stmt` one-liner form.
    fn parse_branch_body(&mut self) -> Option<Vec<crate::ast::Stmt>> {
        if self.match_keyword(Keyword::Ergo) {
            Some(vec![self.parse_statement()?])
        } else {
            Some(self.parse_block())
        }
    }

    pub(super) fn parse_while(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let condition = self.parse_expression()?;
        let body = self.parse_block();
        Some(Stmt::While(WhileLoop { condition, body, position }))
    }

    /// `ex expr pro x {..}` (for-each), `ex expr fiet x {..}` (awaited
    /// for-each), or `ex expr fixum|varia pattern {..}` (destructuring).
    pub(super) fn parse_ex_iteration(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let source = self.parse_expression()?;

        if self.match_keyword(Keyword::Pro) {
            let binding = self.expect_identifier("as the loop binding")?.name;
            let body = self.parse_block();
            return Some(Stmt::ForIteration(ForIteration { source, form: IterationForm::ForEach { binding }, body, position }));
        }
        if self.match_keyword(Keyword::Fiet) {
            let binding = self.expect_identifier("as the loop binding")?.name;
            let body = self.parse_block();
            return Some(Stmt::ForIteration(ForIteration { source, form: IterationForm::ForEachAwait { binding }, body, position }));
        }
        if self.check_keyword(Keyword::Fixum) || self.check_keyword(Keyword::Varia) {
            let mutable = self.check_keyword(Keyword::Varia);
            self.advance();
            let mut pattern = Vec::new();
            loop {
                pattern.push(self.expect_identifier("in the destructuring pattern")?.name);
                if !self.match_operator(Operator::Comma) {
                    break;
                }
            }
            let body = self.parse_block();
            return Some(Stmt::ForIteration(ForIteration { source, form: IterationForm::Destructure { mutable, pattern }, body, position }));
        }

        let found = Self::describe(self.peek());
        self.errors.push(ParseError::UnexpectedToken { expected: "'pro', 'fiet', 'fixum' or 'varia'".to_string(), found, position: self.peek().position });
        None
    }

    /// `de expr pro k {..}` — read-only key iteration.
    pub(super) fn parse_de_iteration(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let source = self.parse_expression()?;
        self.expect_keyword(Keyword::Pro, "before the key binding")?;
        let binding = self.expect_identifier("as the key binding")?.name;
        let body = self.parse_block();
        Some(Stmt::DeIteration(DeIteration { source, binding, body, position }))
    }

    /// `in expr {..}` — bare identifier assignments inside the block
    /// rewrite to property assignments on `expr` (a semantic-analysis
    /// concern; the parser only records the target and body).
    pub(super) fn parse_in_block(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let target = self.parse_expression()?;
        let body = self.parse_block();
        Some(Stmt::InBlock(InBlock { target, body, position }))
    }

    /// `discerne subject { casu Variant [pro a,b | ut c] {..} ... }`; the
    /// wildcard arm spells its variant as the identifier `_`.
    pub(super) fn parse_discerne(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let subject = self.parse_expression()?;
        self.expect_operator(Operator::LBrace, "to open the discerne body")?;

        let mut arms = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            let arm_position = self.peek().position;
            if self.expect_keyword(Keyword::Casu, "to introduce a discerne arm").is_none() {
                self.synchronize();
                continue;
            }

            let variant = if matches!(self.peek().kind, TokenKind::Identifier) && self.peek().text == "_" {
                self.advance();
                None
            } else {
                match self.expect_identifier("as the variant name") {
                    Some(ident) => Some(ident.name),
                    None => {
                        self.synchronize();
                        continue;
                    }
                }
            };

            let binding = if self.match_keyword(Keyword::Pro) {
                let mut names = Vec::new();
                loop {
                    match self.expect_identifier("in the positional binding") {
                        Some(ident) => names.push(ident.name),
                        None => break,
                    }
                    if !self.match_operator(Operator::Comma) {
                        break;
                    }
                }
                DiscerneBinding::Positional(names)
            } else if self.match_keyword(Keyword::Ut) {
                match self.expect_identifier("as the alias binding") {
                    Some(ident) => DiscerneBinding::Alias(ident.name),
                    None => DiscerneBinding::None,
                }
            } else {
                DiscerneBinding::None
            };

            let body = self.parse_block();
            arms.push(DiscerneArm { variant, binding, body, position: arm_position });
        }
        self.expect_operator(Operator::RBrace, "to close the discerne body");
        Some(Stmt::Discerne { subject, arms, position })
    }

    /// `elige subject { (si|ergo) guard {..} ... (aliter|secus) {..}? }`.
    pub(super) fn parse_elige(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let subject = self.parse_expression()?;
        self.expect_operator(Operator::LBrace, "to open the elige body")?;

        let mut arms = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            let arm_position = self.peek().position;
            if self.match_keyword(Keyword::Si) || self.match_keyword(Keyword::Ergo) {
                let guard = self.parse_expression()?;
                let body = self.parse_block();
                arms.push(EligeArm { guard: Some(guard), body, position: arm_position });
            } else if self.match_keyword(Keyword::Aliter) || self.match_keyword(Keyword::Secus) {
                let body = self.parse_block();
                arms.push(EligeArm { guard: None, body, position: arm_position });
            } else {
                let found = Self::describe(self.peek());
                self.errors.push(ParseError::UnexpectedToken { expected: "'si', 'ergo', 'aliter' or 'secus'".to_string(), found, position: arm_position });
                self.synchronize();
            }
        }
        self.expect_operator(Operator::RBrace, "to close the elige body");
        Some(Stmt::Elige { subject, arms, position })
    }

    /// `tempta {..} cape name {..}? demum {..}?`.
    pub(super) fn parse_try_catch(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let try_body = self.parse_block();

        let mut catch_name = None;
        let mut catch_body = Vec::new();
        if self.match_keyword(Keyword::Cape) {
            catch_name = self.expect_identifier("as the caught error binding").map(|i| i.name);
            catch_body = self.parse_block();
        }
        let finally_body = if self.match_keyword(Keyword::Demum) { Some(self.parse_block()) } else { None };

        Some(Stmt::TryCatch(TryCatch { try_body, catch_name, catch_body, finally_body, position }))
    }

    /// `cura [cede] expr fit name {body} cape err {..}?`, or the test-only
    /// `cura ante|post [omnia] {..}` setup/teardown hook.
    pub(super) fn parse_cura(&mut self) -> Option<Stmt> {
        let position = self.advance().position;

        if self.check_keyword(Keyword::Ante) || self.check_keyword(Keyword::Post) {
            let timing = if self.match_keyword(Keyword::Ante) {
                CuraHookTiming::Ante
            } else {
                self.advance();
                CuraHookTiming::Post
            };
            let applies_to_all = self.match_keyword(Keyword::Omnia);
            let body = self.parse_block();
            return Some(Stmt::CuraHook(CuraHook { timing, applies_to_all, body, position }));
        }

        let awaits_acquire = self.match_keyword(Keyword::Cede);
        let resource = self.parse_expression()?;
        self.expect_keyword(Keyword::Fit, "to bind the resource")?;
        let binding = self.expect_identifier("as the resource binding")?.name;
        let body = self.parse_block();

        let mut catch_name = None;
        let mut catch_body = None;
        if self.match_keyword(Keyword::Cape) {
            catch_name = self.expect_identifier("as the caught error binding").map(|i| i.name);
            catch_body = Some(self.parse_block());
        }

        Some(Stmt::Cura(CuraBlock { awaits_acquire, resource, binding, body, catch_name, catch_body, position }))
    }

    /// `probandum "name" {..}`.
    pub(super) fn parse_probandum(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_string_literal("as the probandum name")?;
        let body = self.parse_block();
        Some(Stmt::Probandum(ProbandumBlock { name, body, position }))
    }

    /// `proba [modifier "reason"] "name" {..}`. The optional leading
    /// modifier is recognized by lookahead: an identifier immediately
    /// followed by a string literal (its reason), since the bare test name
    /// string always follows directly otherwise.
    pub(super) fn parse_proba(&mut self) -> Option<Stmt> {
        let position = self.advance().position;

        let (modifier, reason) = if matches!(self.peek().kind, TokenKind::Identifier) && matches!(self.peek_at(1).kind, TokenKind::Str) {
            let modifier = self.advance().text.clone();
            let reason = self.expect_string_literal("as the modifier's reason")?;
            (Some(modifier), Some(reason))
        } else {
            (None, None)
        };

        let name = self.expect_string_literal("as the test name")?;
        let body = self.parse_block();
        Some(Stmt::Proba(ProbaTest { modifier, reason, name, body, position }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Program};
    use crate::file::SourceFile;

    fn parse_source(source: &str) -> (Option<Program>, Vec<ParseError>) {
        let file = SourceFile::in_memory(source);
        let (tokens, lex_errors) = crate::tokenizer::tokenize(&file);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
        crate::parser::parse(&tokens)
    }

    #[test]
    fn si_aliter_si_secus_chain_mixes_keyword_families() {
        let (program, errors) = parse_source("si verum { 1 } aliter si falsum { 2 } secus { 3 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Conditional(cond) => {
                assert_eq!(cond.branches.len(), 2);
                assert!(cond.else_body.is_some());
            }
            other => panic!("expected Conditional, got {other:?}"),
        }
    }

    #[test]
    fn sin_is_interchangeable_with_aliter_si() {
        let (program, errors) = parse_source("si verum { 1 } sin falsum { 2 } aliter { 3 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Conditional(cond) => assert_eq!(cond.branches.len(), 2),
            other => panic!("expected Conditional, got {other:?}"),
        }
    }

    #[test]
    fn ergo_one_liner_branch() {
        let (program, errors) = parse_source("si verum ergo redde 1");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Conditional(cond) => assert_eq!(cond.branches[0].body.len(), 1),
            other => panic!("expected Conditional, got {other:?}"),
        }
    }

    #[test]
    fn ex_pro_for_each() {
        let (program, errors) = parse_source("ex items pro x { redde x }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::ForIteration(it) => assert!(matches!(it.form, IterationForm::ForEach { .. })),
            other => panic!("expected ForIteration, got {other:?}"),
        }
    }

    #[test]
    fn ex_fiet_is_awaited_for_each() {
        let (program, errors) = parse_source("ex items fiet x { redde x }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::ForIteration(it) => assert!(matches!(it.form, IterationForm::ForEachAwait { .. })),
            other => panic!("expected ForIteration, got {other:?}"),
        }
    }

    #[test]
    fn discerne_matches_on_discretio_variants() {
        let (program, errors) = parse_source("discerne subject { casu Click pro a, b { redde a } casu Quit { redde 0 } casu _ { redde 1 } }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Discerne { arms, .. } => {
                assert_eq!(arms.len(), 3);
                assert!(matches!(&arms[0].binding, DiscerneBinding::Positional(names) if names.len() == 2));
                assert!(arms[2].variant.is_none());
            }
            other => panic!("expected Discerne, got {other:?}"),
        }
    }

    #[test]
    fn elige_with_guards_and_default() {
        let (program, errors) = parse_source("elige subject { si verum { redde 1 } aliter { redde 2 } }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Elige { arms, .. } => {
                assert!(arms[0].guard.is_some());
                assert!(arms[1].guard.is_none());
            }
            other => panic!("expected Elige, got {other:?}"),
        }
    }

    #[test]
    fn try_catch_finally() {
        let (program, errors) = parse_source("tempta { redde 1 } cape err { redde 2 } demum { redde 3 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::TryCatch(t) => {
                assert_eq!(t.catch_name.as_deref(), Some("err"));
                assert!(t.finally_body.is_some());
            }
            other => panic!("expected TryCatch, got {other:?}"),
        }
    }

    #[test]
    fn cura_resource_block() {
        let (program, errors) = parse_source("cura apertura() fit f { redde f } cape err { redde 0 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Cura(c) => {
                assert!(!c.awaits_acquire);
                assert_eq!(c.binding, "f");
                assert!(c.catch_body.is_some());
            }
            other => panic!("expected Cura, got {other:?}"),
        }
    }

    #[test]
    fn cura_ante_hook() {
        let (program, errors) = parse_source("cura ante omnia { redde 0 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::CuraHook(hook) => {
                assert_eq!(hook.timing, CuraHookTiming::Ante);
                assert!(hook.applies_to_all);
            }
            other => panic!("expected CuraHook, got {other:?}"),
        }
    }

    #[test]
    fn probandum_groups_tests() {
        let (program, errors) = parse_source("probandum \"arithmetic\" { proba \"adds\" { redde 1 } }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::Probandum(p) => {
                assert_eq!(p.name, "arithmetic");
                assert_eq!(p.body.len(), 1);
            }
            other => panic!("expected Probandum, got {other:?}"),
        }
    }

    #[test]
    fn in_block_rewrites_bare_assignments() {
        let (program, errors) = parse_source("in obj { x = 1 }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program.unwrap().statements[0] {
            Stmt::InBlock(b) => assert_eq!(b.body.len(), 1),
            other => panic!("expected InBlock, got {other:?}"),
        }
    }

    #[test]
    fn iace_and_mori_both_parse_as_throw() {
        let (program, errors) = parse_source("iace 1\nmori 2");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        assert!(matches!(program.statements[0], Stmt::Throw { .. }));
        assert!(matches!(program.statements[1], Stmt::Throw { .. }));
    }

    #[test]
    fn scribe_and_affirma_statements() {
        let (program, errors) = parse_source("scribe 1\naffirma verum, \"should hold\"");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        assert!(matches!(program.statements[0], Stmt::Output { .. }));
        match &program.statements[1] {
            Stmt::Assertion { message, .. } => assert!(matches!(message.as_ref().unwrap().kind, ExprKind::StringLiteral(_))),
            other => panic!("expected Assertion, got {other:?}"),
        }
    }
}
