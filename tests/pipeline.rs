//! End-to-end pipeline tests: tokenize -> parse -> analyze run together
//! against the literal scenarios in spec.md §8, plus the cross-cutting
//! properties (module cycles, diamond caching, scope rules) that no
//! single module's unit tests exercise in combination.
//!
//! Grounded on how `libtimu` separates `crates/libtimu/tests/` (full
//! pipeline, file-backed) from its own `src` unit tests; this crate's
//! per-module unit tests stay in-module, this file is for the handful of
//! properties that only show up once all three stages run together.

use faber_romanus::semantic::SemanticError;
use faber_romanus::{analyze, parse, tokenize, AnalysisOptions, SourceFile};

fn run(source: &str) -> (Option<faber_romanus::Program>, Vec<SemanticError>) {
    let file = SourceFile::in_memory(source);
    let (tokens, lex_errors) = tokenize(&file);
    assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
    let (program, parse_errors) = parse(&tokens);
    assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
    let program = program.expect("parser produced no program");
    let (program, semantic_errors) = analyze(program, AnalysisOptions::default());
    (Some(program), semantic_errors)
}

#[test]
fn scenario_1_var_decl_resolves_to_numerus() {
    let (program, errors) = run("varia numerus x = 5");
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    let program = program.unwrap();
    let resolved = match &program.statements[0] {
        faber_romanus::ast::Stmt::VarDecl(decl) => decl.initializer.as_ref().unwrap().resolved_type.clone(),
        other => panic!("expected a var decl, got {other:?}"),
    };
    let resolved = resolved.expect("initializer must have a resolved type");
    assert_eq!(format!("{resolved:?}"), format!("{:?}", faber_romanus::semantic::SemanticType::primitive(faber_romanus::semantic::Primitive::Numerus, false)));
}

#[test]
fn scenario_2_immutable_reassignment_is_an_error() {
    let (_, errors) = run("fixum x = 5\nx = 10");
    assert_eq!(errors.len(), 1, "expected exactly one error, got {errors:?}");
    assert!(matches!(errors[0], SemanticError::ImmutableReassignment { .. }));
}

#[test]
fn scenario_3_type_mismatch_on_reassignment_mentions_not_assignable() {
    let (_, errors) = run("varia numerus x = 5\nx = \"hello\"");
    assert_eq!(errors.len(), 1, "expected exactly one error, got {errors:?}");
    match &errors[0] {
        SemanticError::TypeMismatch { .. } => {
            assert!(errors[0].to_string().to_lowercase().contains("not assignable"));
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn scenario_4_discerne_positional_binding_mismatch_mentions_numerus() {
    let source = "discretio Event { Click { numerus x, numerus y } Quit }\n\
                  cercare(Event evt) vacuum fit {\n\
                      discerne evt {\n\
                          casu Click pro a, b { varia textus wrong = a }\n\
                          casu Quit { redde }\n\
                          casu _ { redde }\n\
                      }\n\
                  }";
    let (_, errors) = run(source);
    let mismatches: Vec<_> = errors.iter().filter(|e| matches!(e, SemanticError::TypeMismatch { .. })).collect();
    assert_eq!(mismatches.len(), 1, "expected exactly one type mismatch, got {errors:?}");
    assert!(mismatches[0].to_string().to_lowercase().contains("numerus"));
}

#[test]
fn scenario_5_unterminated_string_reports_lexical_error() {
    let file = SourceFile::in_memory("\"unterminated\n");
    let (_, errors) = tokenize(&file);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], faber_romanus::LexError::UnterminatedString { .. }));
}

#[test]
fn scenario_6_hex_literal_with_bigint_suffix_tokenizes_as_bigint() {
    let file = SourceFile::in_memory("0xFFn");
    let (tokens, errors) = tokenize(&file);
    assert!(errors.is_empty());
    assert_eq!(tokens[0].kind, faber_romanus::token::TokenKind::BigInt);
    assert_eq!(tokens[0].text, "0xFFn");
}

#[test]
fn module_cycle_between_two_files_resolves_without_a_cycle_error() {
    let dir = std::env::temp_dir().join(format!("faber-romanus-cycle-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let a_path = dir.join("a.fab");
    let b_path = dir.join("b.fab");
    std::fs::write(&a_path, "importa { helper } ex \"./b\"\nvaria numerus x = 1").unwrap();
    std::fs::write(&b_path, "importa { x } ex \"./a\"\nhelper() vacuum fit { redde }").unwrap();

    let source = std::fs::read_to_string(&a_path).unwrap();
    let file = SourceFile::new(a_path.clone(), source);
    let (tokens, lex_errors) = tokenize(&file);
    assert!(lex_errors.is_empty());
    let (program, parse_errors) = parse(&tokens);
    assert!(parse_errors.is_empty());
    let program = program.expect("parser produced no program");
    let (_, errors) = analyze(program, AnalysisOptions { file_path: Some(a_path.clone()) });

    assert!(
        !errors.iter().any(|e| matches!(e, SemanticError::ModuleNotFound { .. })),
        "mutually-importing modules must not report a missing module: {errors:?}"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn assignability_unknown_is_bidirectional() {
    use faber_romanus::semantic::SemanticType;
    let unknown = SemanticType::Unknown;
    let numerus = SemanticType::primitive(faber_romanus::semantic::Primitive::Numerus, false);
    assert!(unknown.is_assignable_to(&numerus));
    assert!(numerus.is_assignable_to(&unknown));
}

#[test]
fn assignability_nihil_requires_a_nullable_target() {
    use faber_romanus::semantic::{Primitive, SemanticType};
    let nihil = SemanticType::primitive(Primitive::Nihil, false);
    let numerus = SemanticType::primitive(Primitive::Numerus, false);
    let nullable_numerus = SemanticType::primitive(Primitive::Numerus, true);
    assert!(!nihil.is_assignable_to(&numerus));
    assert!(nihil.is_assignable_to(&nullable_numerus));
}

#[test]
fn numeric_promotion_is_transitive_within_the_numeric_family() {
    use faber_romanus::semantic::{Primitive, SemanticType};
    let numerus = SemanticType::primitive(Primitive::Numerus, false);
    let fractus = SemanticType::primitive(Primitive::Fractus, false);
    let decimus = SemanticType::primitive(Primitive::Decimus, false);
    assert!(numerus.is_assignable_to(&fractus));
    assert!(fractus.is_assignable_to(&decimus));
    assert!(numerus.is_assignable_to(&decimus));
}

#[test]
fn scope_rules_inner_block_binding_does_not_escape() {
    let source = "varia numerus x = 1\n\
                  si verum {\n\
                      varia numerus y = 2\n\
                  }\n\
                  scribe y";
    let (_, errors) = run(source);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::UndefinedVariable { name, .. } if name == "y")));
}

#[test]
fn scope_rules_inner_shadow_does_not_alter_outer_binding() {
    let source = "varia numerus x = 1\n\
                  si verum {\n\
                      varia textus x = \"shadowed\"\n\
                  }\n\
                  varia numerus z = x";
    let (_, errors) = run(source);
    assert!(errors.is_empty(), "shadowing in an inner block must not affect the outer binding: {errors:?}");
}

#[test]
fn in_block_rewrites_bare_assignment_to_a_member_assignment_on_the_target() {
    use faber_romanus::ast::{ExprKind, Stmt};
    use faber_romanus::semantic::{Primitive, SemanticType};

    let source = "genus Punctum { numerus x numerus y }\n\
                  varia Punctum p = novum Punctum { x: 1, y: 2 }\n\
                  in p { x = 5 }";
    let (program, errors) = run(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let program = program.unwrap();
    let in_block = match &program.statements[2] {
        Stmt::InBlock(block) => block,
        other => panic!("expected an InBlock statement, got {other:?}"),
    };
    let assignment_target = match &in_block.body[0] {
        Stmt::Expr(expr) => match &expr.kind {
            ExprKind::Assignment { target, .. } => target,
            other => panic!("expected an assignment expression, got {other:?}"),
        },
        other => panic!("expected an expression statement, got {other:?}"),
    };
    match &assignment_target.kind {
        ExprKind::Member { property, .. } => {
            assert_eq!(property, "x");
            assert_eq!(assignment_target.resolved_type, Some(SemanticType::primitive(Primitive::Numerus, false)));
        }
        other => panic!("bare identifier assignment inside 'in' must rewrite to a member assignment, got {other:?}"),
    }
}

#[test]
fn in_block_assignment_mismatched_with_the_targets_field_type_is_reported() {
    let source = "genus Punctum { numerus x numerus y }\n\
                  varia Punctum p = novum Punctum { x: 1, y: 2 }\n\
                  in p { x = \"oops\" }";
    let (_, errors) = run(source);
    assert_eq!(errors.iter().filter(|e| matches!(e, SemanticError::TypeMismatch { .. })).count(), 1, "{errors:?}");
    assert!(
        !errors.iter().any(|e| matches!(e, SemanticError::UndefinedVariable { .. })),
        "must type-check against the target's field, not fall back to a local-scope lookup: {errors:?}"
    );
}
