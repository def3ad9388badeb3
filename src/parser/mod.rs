//! Recursive-descent parser: tokens → [`Program`] AST, collecting
//! [`ParseError`]s without aborting (spec.md §4.3).
//!
//! Grounded on `libtimu::parser`'s per-construct file layout (one file per
//! grammar production: `variable.rs`, `function_definition.rs`,
//! `class.rs`, `control.rs`, ...), but the teacher drives its grammar
//! straight off `nom` combinators over raw source text. This parser instead
//! walks a `&[Token]` slice with hand-written cursor methods: spec.md §2
//! requires tokenizing and parsing as two decoupled stages, so there is no
//! source text left by the time this module runs, only the token stream
//! the tokenizer already produced.

mod control;
mod error;
mod expr;
mod types;

pub use error::ParseError;

use crate::ast::{FunctionDecl, FunctionModifiers, Ident, Param, Program, Stmt, TypeAliasDecl, VarDecl};
use crate::lexicon::Keyword;
use crate::position::Position;
use crate::token::{Operator, Token, TokenKind};

/// Parses a full token stream into a [`Program`], alongside any syntax
/// errors collected along the way. `program` is `None` only when no
/// statement at all could be recovered (spec.md §6: "`program` absent iff
/// fatal errors occurred").
pub fn parse(tokens: &[Token]) -> (Option<Program>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let statements = parser.parse_program();
    let program = if statements.is_empty() && !parser.errors.is_empty() { None } else { Some(Program { statements }) };
    (program, parser.errors)
}

pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    fn parse_program(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        statements
    }

    // --- cursor primitives ---

    fn peek(&self) -> &'t Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().expect("token stream always has an eof token"))
    }

    fn peek_at(&self, offset: usize) -> &'t Token {
        self.tokens.get(self.pos + offset).unwrap_or_else(|| self.tokens.last().expect("token stream always has an eof token"))
    }

    fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().expect("token stream always has an eof token"));
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn check_operator(&self, op: Operator) -> bool {
        matches!(&self.peek().kind, TokenKind::Operator(o) if *o == op)
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw)
    }

    fn match_operator(&mut self, op: Operator) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn describe(token: &Token) -> String {
        match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Keyword(k) => format!("'{}'", k.as_str()),
            TokenKind::Operator(o) => format!("'{}'", o.as_str()),
            _ => format!("'{}'", token.text),
        }
    }

    fn expect_operator(&mut self, op: Operator, context: &str) -> Option<Position> {
        if self.check_operator(op) {
            Some(self.advance().position)
        } else {
            let found = Self::describe(self.peek());
            self.errors.push(ParseError::UnexpectedToken { expected: format!("'{}' {context}", op.as_str()), found, position: self.peek().position });
            None
        }
    }

    fn expect_keyword(&mut self, kw: Keyword, context: &str) -> Option<Position> {
        if self.check_keyword(kw) {
            Some(self.advance().position)
        } else {
            let found = Self::describe(self.peek());
            self.errors.push(ParseError::UnexpectedToken { expected: format!("'{}' {context}", kw.as_str()), found, position: self.peek().position });
            None
        }
    }

    fn expect_string_literal(&mut self, context: &str) -> Option<String> {
        if let TokenKind::Str = self.peek().kind {
            let token = self.advance();
            Some(crate::tokenizer::decode_string_literal(&token.text))
        } else {
            let found = Self::describe(self.peek());
            self.errors.push(ParseError::UnexpectedToken { expected: format!("a string literal {context}"), found, position: self.peek().position });
            None
        }
    }

    fn expect_identifier(&mut self, context: &str) -> Option<Ident> {
        if let TokenKind::Identifier = &self.peek().kind {
            let token = self.advance();
            Some(Ident { name: token.text.clone(), position: token.position })
        } else {
            let found = Self::describe(self.peek());
            self.errors.push(ParseError::UnexpectedToken { expected: format!("an identifier {context}"), found, position: self.peek().position });
            None
        }
    }

    /// Panic-mode recovery: discard tokens until one that plausibly starts
    /// a new statement, or a block boundary (spec.md §4.3: "skipping to
    /// the next statement boundary").
    fn synchronize(&mut self) {
        if self.at_eof() {
            return;
        }
        self.advance();
        while !self.at_eof() {
            if self.check_operator(Operator::RBrace) {
                return;
            }
            if matches!(
                &self.peek().kind,
                TokenKind::Keyword(
                    Keyword::Varia
                        | Keyword::Fixum
                        | Keyword::Si
                        | Keyword::Dum
                        | Keyword::Ex
                        | Keyword::De
                        | Keyword::In
                        | Keyword::Discerne
                        | Keyword::Elige
                        | Keyword::Tempta
                        | Keyword::Cura
                        | Keyword::Probandum
                        | Keyword::Proba
                        | Keyword::Genus
                        | Keyword::Pactum
                        | Keyword::Ordo
                        | Keyword::Discretio
                        | Keyword::Importa
                        | Keyword::Redde
                        | Keyword::Rumpe
                        | Keyword::Perge
                        | Keyword::Iace
                        | Keyword::Mori
                        | Keyword::Scribe
                        | Keyword::Affirma
                )
            ) {
                return;
            }
            self.advance();
        }
    }

    /// A brace-delimited statement sequence.
    fn parse_block(&mut self) -> Vec<Stmt> {
        self.expect_operator(Operator::LBrace, "to open a block");
        let mut body = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            match self.parse_statement() {
                Some(stmt) => body.push(stmt),
                None => self.synchronize(),
            }
        }
        self.expect_operator(Operator::RBrace, "to close a block");
        body
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match &self.peek().kind {
            TokenKind::Keyword(Keyword::Varia) | TokenKind::Keyword(Keyword::Fixum) => self.parse_var_decl().map(Stmt::VarDecl),
            TokenKind::Keyword(Keyword::Importa) => self.parse_import(),
            TokenKind::Keyword(Keyword::Genus) => self.parse_genus(),
            TokenKind::Keyword(Keyword::Pactum) => self.parse_pactum(),
            TokenKind::Keyword(Keyword::Ordo) => self.parse_ordo(),
            TokenKind::Keyword(Keyword::Discretio) => self.parse_discretio(),
            TokenKind::Keyword(Keyword::Typus) => self.parse_type_alias_stmt(),
            TokenKind::Keyword(Keyword::Si) => self.parse_conditional(),
            TokenKind::Keyword(Keyword::Dum) => self.parse_while(),
            TokenKind::Keyword(Keyword::Ex) => self.parse_ex_iteration(),
            TokenKind::Keyword(Keyword::De) => self.parse_de_iteration(),
            TokenKind::Keyword(Keyword::In) => self.parse_in_block(),
            TokenKind::Keyword(Keyword::Discerne) => self.parse_discerne(),
            TokenKind::Keyword(Keyword::Elige) => self.parse_elige(),
            TokenKind::Keyword(Keyword::Tempta) => self.parse_try_catch(),
            TokenKind::Keyword(Keyword::Cura) => self.parse_cura(),
            TokenKind::Keyword(Keyword::Probandum) => self.parse_probandum(),
            TokenKind::Keyword(Keyword::Proba) => self.parse_proba(),
            TokenKind::Keyword(Keyword::Redde) => self.parse_return(),
            TokenKind::Keyword(Keyword::Rumpe) => {
                let position = self.advance().position;
                Some(Stmt::Break { position })
            }
            TokenKind::Keyword(Keyword::Perge) => {
                let position = self.advance().position;
                Some(Stmt::Continue { position })
            }
            TokenKind::Keyword(Keyword::Iace) | TokenKind::Keyword(Keyword::Mori) => self.parse_throw(),
            TokenKind::Keyword(Keyword::Scribe) => self.parse_output(),
            TokenKind::Keyword(Keyword::Affirma) => self.parse_assertion(),
            _ if self.looks_like_function_decl() => self.parse_function_decl().map(Stmt::FunctionDecl),
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_expr_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression()?;
        Some(Stmt::Expr(expr))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let value = if self.starts_expression() { self.parse_expression() } else { None };
        Some(Stmt::Return { value, position })
    }

    fn parse_throw(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let value = self.parse_expression()?;
        Some(Stmt::Throw { value, position })
    }

    fn parse_output(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let value = self.parse_expression()?;
        Some(Stmt::Output { value, position })
    }

    fn parse_assertion(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let condition = self.parse_expression()?;
        let message = if self.match_operator(Operator::Comma) { self.parse_expression() } else { None };
        Some(Stmt::Assertion { condition, message, position })
    }

    fn starts_expression(&self) -> bool {
        !matches!(&self.peek().kind, TokenKind::Operator(Operator::RBrace) | TokenKind::Eof)
    }

    fn parse_import(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let mut names = Vec::new();
        if self.match_operator(Operator::LBrace) {
            loop {
                if let Some(ident) = self.expect_identifier("in the import list") {
                    names.push(ident.name);
                }
                if !self.match_operator(Operator::Comma) {
                    break;
                }
            }
            self.expect_operator(Operator::RBrace, "to close the import list");
            self.expect_keyword(Keyword::Ex, "before the module path");
        }
        let path = self.expect_string_literal("as the module path")?;
        Some(Stmt::Import(crate::ast::ImportDecl { path, names, position }))
    }

    /// `varia|fixum [type] name (= expr)?` (spec.md §4.3). A bare `varia
    /// name` with neither a type nor an initializer is an error.
    fn parse_var_decl(&mut self) -> Option<VarDecl> {
        let keyword_token = self.advance();
        let mutable = matches!(keyword_token.kind, TokenKind::Keyword(Keyword::Varia));
        let keyword_text = keyword_token.text.clone();
        let position = keyword_token.position;

        let type_annotation = if self.looks_like_type_start() && !self.next_is_assign_after_identifier() { Some(self.parse_type_expr()?) } else { None };
        let name = self.expect_identifier("in the variable declaration")?.name;
        let initializer = if self.match_operator(Operator::Assign) { self.parse_expression() } else { None };

        if type_annotation.is_none() && initializer.is_none() {
            self.errors.push(ParseError::BareDeclaration { keyword: keyword_text, position });
            return None;
        }

        Some(VarDecl { mutable, type_annotation, name, initializer, position })
    }

    /// Disambiguates `varia name = expr` (no type) from `varia Type name =
    /// expr`: if the identifier immediately after the keyword is itself
    /// followed by `=`, it's the variable name, not a type.
    fn next_is_assign_after_identifier(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Identifier) && matches!(self.peek_at(1).kind, TokenKind::Operator(Operator::Assign))
    }

    fn looks_like_type_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Identifier)
    }

    fn looks_like_function_decl(&self) -> bool {
        // A function declaration's name is followed (after optional type
        // params and value params in parens) by one of the return-arrow
        // family tokens. Scan ahead past a balanced `(...)` to check.
        if !matches!(self.peek().kind, TokenKind::Identifier) {
            return false;
        }
        if !matches!(self.peek_at(1).kind, TokenKind::Operator(Operator::LParen)) {
            return false;
        }
        let mut depth = 0i32;
        let mut offset = 1;
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
        // What follows the parameter list is optional `futura`/`cursor`
        // markers, then an optional type-first return type, then the verb.
        // No colon ever appears (the `f(x: T)` parameter form is explicitly
        // rejected by spec.md's REDESIGN FLAGS); scan a bounded window for
        // the verb token, bailing out at a block or statement boundary.
        for _ in 0..8 {
            match &self.peek_at(offset).kind {
                TokenKind::Operator(Operator::Arrow)
                | TokenKind::Keyword(Keyword::Fit)
                | TokenKind::Keyword(Keyword::Fiet)
                | TokenKind::Keyword(Keyword::Fiunt)
                | TokenKind::Keyword(Keyword::Fient) => return true,
                TokenKind::Operator(Operator::LBrace) | TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
        false
    }

    /// Function declarations (spec.md §4.3): a unified return-arrow family
    /// (`->`, `fit`, `fiet`, `fiunt`, `fient`) where the verb alone sets
    /// async/generator semantics; `futura`/`cursor` explicit prefixes
    /// conflicting with the verb's own implication are errors.
    fn parse_function_decl(&mut self) -> Option<FunctionDecl> {
        let name_token = self.advance();
        let name = name_token.text.clone();
        let position = name_token.position;

        let (type_params, params) = self.parse_param_list()?;

        let mut explicit_async = false;
        let mut explicit_generator = false;
        if self.match_keyword(Keyword::Futura) {
            explicit_async = true;
        }
        if self.match_keyword(Keyword::Cursor) {
            explicit_generator = true;
        }

        // Type-first return type, no colon (spec.md's REDESIGN FLAGS reject
        // the `f(x: T)` colon-typed form borrowed from other languages; the
        // return type, when present, sits directly before the verb).
        let return_type = if self.is_return_arrow_token() { None } else { Some(self.parse_type_expr()?) };

        let verb_token = self.advance();
        let (is_async, is_generator) = match &verb_token.kind {
            TokenKind::Operator(Operator::Arrow) => (false, false),
            TokenKind::Keyword(Keyword::Fit) => (false, false),
            TokenKind::Keyword(Keyword::Fiet) => (true, false),
            TokenKind::Keyword(Keyword::Fiunt) => (false, true),
            TokenKind::Keyword(Keyword::Fient) => (true, true),
            _ => {
                self.errors.push(ParseError::UnexpectedToken {
                    expected: "'->', 'fit', 'fiet', 'fiunt' or 'fient'".to_string(),
                    found: Self::describe(verb_token),
                    position: verb_token.position,
                });
                return None;
            }
        };

        if explicit_async && !is_async {
            self.errors.push(ParseError::ConflictingModifier { verb: verb_token.text.clone(), implied: "non-async".to_string(), position: verb_token.position });
        }
        if explicit_generator && !is_generator {
            self.errors.push(ParseError::ConflictingModifier { verb: verb_token.text.clone(), implied: "non-generator".to_string(), position: verb_token.position });
        }

        let body = self.parse_block();
        Some(FunctionDecl { name, type_params, params, return_type, modifiers: FunctionModifiers { is_async, is_generator }, body, position })
    }

    /// `(prae typus T, ..., Type name, ...)`. Parameters are type-first,
    /// matching the variable-declaration surface — the `f(x: T)` colon form
    /// is explicitly rejected (spec.md's REDESIGN FLAGS). Type parameters
    /// must precede value parameters (spec.md §4.3).
    fn parse_param_list(&mut self) -> Option<(Vec<Param>, Vec<Param>)> {
        self.expect_operator(Operator::LParen, "to open the parameter list")?;
        let mut type_params = Vec::new();
        let mut params = Vec::new();
        let mut seen_value_param = false;

        while !self.check_operator(Operator::RParen) && !self.at_eof() {
            if self.check_keyword(Keyword::Prae) {
                let position = self.advance().position;
                self.expect_keyword(Keyword::Typus, "after 'prae'");
                let name = self.expect_identifier("as a type parameter name")?.name;
                if seen_value_param {
                    self.errors.push(ParseError::TypeParamAfterValueParam { name: name.clone(), position });
                }
                type_params.push(Param { name, type_annotation: None, is_type_param: true, position });
            } else {
                let position = self.peek().position;
                seen_value_param = true;
                // A bare name with no type (lambdas allow this, matching
                // `fixum x = 5`'s untyped variable form) looks like `IDENT`
                // directly followed by `,` or `)`; anything else is a
                // type-first `Type name` pair.
                if matches!(self.peek().kind, TokenKind::Identifier) && matches!(self.peek_at(1).kind, TokenKind::Operator(Operator::Comma) | TokenKind::Operator(Operator::RParen)) {
                    let name = self.expect_identifier("as a parameter name")?.name;
                    params.push(Param { name, type_annotation: None, is_type_param: false, position });
                } else {
                    let type_annotation = self.parse_type_expr()?;
                    let name = self.expect_identifier("as a parameter name")?.name;
                    params.push(Param { name, type_annotation: Some(type_annotation), is_type_param: false, position });
                }
            }
            if !self.match_operator(Operator::Comma) {
                break;
            }
        }
        self.expect_operator(Operator::RParen, "to close the parameter list")?;
        Some((type_params, params))
    }

    /// Whether the cursor sits on a return-arrow-family token (`->`, `fit`,
    /// `fiet`, `fiunt`, `fient`) — used to tell "no return type given" apart
    /// from "a return type follows" in the type-first function grammar.
    fn is_return_arrow_token(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Operator(Operator::Arrow)
                | TokenKind::Keyword(Keyword::Fit)
                | TokenKind::Keyword(Keyword::Fiet)
                | TokenKind::Keyword(Keyword::Fiunt)
                | TokenKind::Keyword(Keyword::Fient)
        )
    }

    fn parse_genus(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_identifier("as the genus name")?.name;
        self.expect_operator(Operator::LBrace, "to open the genus body")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            if self.looks_like_function_decl() {
                if let Some(method) = self.parse_function_decl() {
                    methods.push(method);
                }
            } else {
                // `Type name` — type-first field declaration, matching the
                // variable-declaration surface (no colon).
                let position = self.peek().position;
                match self.parse_type_expr() {
                    Some(type_annotation) => match self.expect_identifier("as a field name") {
                        Some(ident) => fields.push(crate::ast::Field { name: ident.name, type_annotation, position }),
                        None => self.synchronize(),
                    },
                    None => self.synchronize(),
                }
            }
        }
        self.expect_operator(Operator::RBrace, "to close the genus body");
        Some(Stmt::Genus(crate::ast::GenusDecl { name, fields, methods, position }))
    }

    fn parse_pactum(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_identifier("as the pactum name")?.name;
        self.expect_operator(Operator::LBrace, "to open the pactum body")?;

        let mut methods = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            if !matches!(self.peek().kind, TokenKind::Identifier) {
                self.synchronize();
                continue;
            }
            let name_token = self.advance();
            let method_name = name_token.text.clone();
            let method_position = name_token.position;
            match self.parse_param_list() {
                Some((_, params)) => {
                    // Type-first return type, no colon — same convention as
                    // function declarations and genus fields.
                    let return_type = if matches!(self.peek().kind, TokenKind::Identifier) { self.parse_type_expr() } else { None };
                    methods.push(crate::ast::MethodSignature { name: method_name, params, return_type, position: method_position });
                }
                None => self.synchronize(),
            }
        }
        self.expect_operator(Operator::RBrace, "to close the pactum body");
        Some(Stmt::Pactum(crate::ast::PactumDecl { name, methods, position }))
    }

    fn parse_ordo(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_identifier("as the ordo name")?.name;
        self.expect_operator(Operator::LBrace, "to open the ordo body")?;
        let mut members = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            if let Some(ident) = self.expect_identifier("as an ordo member") {
                members.push(ident.name);
            } else {
                self.synchronize();
                continue;
            }
            if !self.match_operator(Operator::Comma) {
                break;
            }
        }
        self.expect_operator(Operator::RBrace, "to close the ordo body");
        Some(Stmt::Ordo(crate::ast::OrdoDecl { name, members, position }))
    }

    fn parse_discretio(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_identifier("as the discretio name")?.name;
        self.expect_operator(Operator::LBrace, "to open the discretio body")?;

        let mut variants = Vec::new();
        while !self.at_eof() && !self.check_operator(Operator::RBrace) {
            let variant_ident = match self.expect_identifier("as a discretio variant name") {
                Some(ident) => ident,
                None => {
                    self.synchronize();
                    continue;
                }
            };
            let mut fields = Vec::new();
            if self.match_operator(Operator::LBrace) {
                while !self.at_eof() && !self.check_operator(Operator::RBrace) {
                    // `numerus x, numerus y` — type-first field lists, matching
                    // the variable-declaration surface.
                    let field_type = match self.parse_type_expr() {
                        Some(t) => t,
                        None => {
                            self.synchronize();
                            continue;
                        }
                    };
                    let field_ident = match self.expect_identifier("as a variant field name") {
                        Some(ident) => ident,
                        None => {
                            self.synchronize();
                            continue;
                        }
                    };
                    fields.push(crate::ast::Field { name: field_ident.name, type_annotation: field_type, position: field_ident.position });
                    if !self.match_operator(Operator::Comma) {
                        break;
                    }
                }
                self.expect_operator(Operator::RBrace, "to close the variant's field list");
            }
            variants.push(crate::ast::DiscretioVariant { name: variant_ident.name, fields, position: variant_ident.position });
        }
        self.expect_operator(Operator::RBrace, "to close the discretio body");
        Some(Stmt::Discretio(crate::ast::DiscretioDecl { name, variants, position }))
    }

    /// `typus Name = Type` (spec.md §3 names type-alias as a statement kind
    /// but does not fix its surface spelling; `typus` is reused from the
    /// `prae typus T` type-parameter marker since both introduce a type
    /// binding).
    fn parse_type_alias_stmt(&mut self) -> Option<Stmt> {
        let position = self.advance().position;
        let name = self.expect_identifier("as the type alias name")?.name;
        self.expect_operator(Operator::Assign, "in the type alias")?;
        let target = self.parse_type_expr()?;
        Some(Stmt::TypeAlias(TypeAliasDecl { name, target, position }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;

    fn parse_source(source: &str) -> (Option<Program>, Vec<ParseError>) {
        let file = SourceFile::in_memory(source);
        let (tokens, lex_errors) = crate::tokenizer::tokenize(&file);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
        parse(&tokens)
    }

    #[test]
    fn simple_var_decl_with_type_and_initializer() {
        let (program, errors) = parse_source("varia numerus x = 5");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::VarDecl(decl) => {
                assert!(decl.mutable);
                assert_eq!(decl.name, "x");
                assert!(decl.type_annotation.is_some());
                assert!(decl.initializer.is_some());
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn var_decl_without_type_infers_from_initializer() {
        let (program, errors) = parse_source("fixum x = 5");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::VarDecl(decl) => {
                assert!(!decl.mutable);
                assert!(decl.type_annotation.is_none());
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn bare_declaration_with_neither_type_nor_initializer_is_an_error() {
        let (_, errors) = parse_source("varia x");
        assert!(errors.iter().any(|e| matches!(e, ParseError::BareDeclaration { .. })));
    }

    #[test]
    fn two_statements_on_separate_lines_parse_independently() {
        let (program, errors) = parse_source("fixum x = 5\nx = 10");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[1], Stmt::Expr(_)));
    }

    #[test]
    fn function_declaration_with_fit_arrow() {
        let (program, errors) = parse_source("adde(numerus a, numerus b) numerus fit { redde a }");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::FunctionDecl(decl) => {
                assert_eq!(decl.name, "adde");
                assert_eq!(decl.params.len(), 2);
                assert!(!decl.modifiers.is_async);
                assert!(!decl.modifiers.is_generator);
            }
            other => panic!("expected FunctionDecl, got {other:?}"),
        }
    }

    #[test]
    fn async_function_via_fiet_sets_modifier() {
        let (program, errors) = parse_source("carica() numerus fiet { redde 1 }");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::FunctionDecl(decl) => assert!(decl.modifiers.is_async),
            other => panic!("expected FunctionDecl, got {other:?}"),
        }
    }

    #[test]
    fn genus_with_fields_and_a_method() {
        let (program, errors) = parse_source("genus Punctum { numerus x numerus y distantia() numerus fit { redde 0 } }");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::Genus(decl) => {
                assert_eq!(decl.fields.len(), 2);
                assert_eq!(decl.methods.len(), 1);
            }
            other => panic!("expected Genus, got {other:?}"),
        }
    }

    #[test]
    fn discretio_event_with_variants() {
        let (program, errors) = parse_source("discretio Event { Click { numerus x, numerus y } Quit }");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::Discretio(decl) => {
                assert_eq!(decl.variants.len(), 2);
                assert_eq!(decl.variants[0].fields.len(), 2);
                assert!(decl.variants[1].fields.is_empty());
            }
            other => panic!("expected Discretio, got {other:?}"),
        }
    }

    #[test]
    fn import_with_named_bindings() {
        let (program, errors) = parse_source("importa { foo, bar } ex \"./helper\"");
        assert!(errors.is_empty(), "{errors:?}");
        let program = program.unwrap();
        match &program.statements[0] {
            Stmt::Import(decl) => {
                assert_eq!(decl.names, vec!["foo".to_string(), "bar".to_string()]);
                assert_eq!(decl.path, "./helper");
            }
            other => panic!("expected Import, got {other:?}"),
        }
    }
}
