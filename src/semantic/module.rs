//! Cross-file import resolution: path classification, the module cache,
//! cycle tolerance, and three-pass export extraction.
//!
//! Grounded on `libtimu::tir::module`'s `Module`/`ModuleRef` cache, reshaped
//! around spec.md §4.4's explicit cycle rule: re-entering a file already
//! being loaded yields *empty exports*, never an error, so mutual imports
//! (`A` imports `B`, `B` imports `A`) resolve instead of looping forever.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::ast::{Program, Stmt};
use crate::position::Position;
use crate::semantic::error::SemanticError;
use crate::semantic::types::{DiscretioType, DiscretioVariant, FunctionType, GenusType, OrdoType, PactumType, SemanticType};

/// How an import path classifies (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `./foo`, `../foo` — resolved relative to the importing file.
    Local,
    /// `norma` or `norma/*` — compiler intrinsics.
    Intrinsic,
    /// Anything else — left to the target language's package system.
    External,
}

pub fn classify(path: &str) -> ModuleKind {
    if path.starts_with("./") || path.starts_with("../") {
        ModuleKind::Local
    } else if path == "norma" || path.starts_with("norma/") {
        ModuleKind::Intrinsic
    } else {
        ModuleKind::External
    }
}

/// Resolves a local import path relative to the importing file's
/// directory, appending the implicit `.fab` extension when absent.
pub fn resolve_local_path(importer_dir: &Path, raw_path: &str) -> PathBuf {
    let mut resolved = importer_dir.join(raw_path);
    if resolved.extension().is_none() {
        resolved.set_extension("fab");
    }
    resolved
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Function,
    Variable,
    Type,
    Genus,
    Pactum,
    Ordo,
    Discretio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExport {
    pub ty: SemanticType,
    pub kind: ExportKind,
}

/// One loaded module's exports, paired with the program it came from so
/// the caller can recurse into it further if needed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleExports {
    pub exports: IndexMap<String, ModuleExport>,
}

impl ModuleExports {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Owns the module cache and in-progress set for one analysis
/// (spec.md §5: "the module cache and in-progress set are owned by a
/// single analysis context and are not shared across parallel analyses").
#[derive(Debug, Default)]
pub struct ModuleCache {
    cache: IndexMap<PathBuf, ModuleExports>,
    in_progress: HashSet<PathBuf>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and caches the module at `path`, reading it from disk,
    /// tokenizing, parsing and extracting its exports. `analyze_program`
    /// is supplied by the caller (the top-level `analyze` entry point) so
    /// this module doesn't need to import the analyzer itself, avoiding a
    /// circular module dependency between resolution and analysis — each
    /// recursively needs the other.
    pub fn load(
        &mut self,
        path: &Path,
        import_position: Position,
        errors: &mut Vec<SemanticError>,
        analyze_program: &mut dyn FnMut(&mut Program, &mut ModuleCache, &Path) -> Vec<SemanticError>,
    ) -> ModuleExports {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }

        if self.in_progress.contains(path) {
            // Cycle: model as empty exports rather than failing (spec.md §3, §4.4).
            return ModuleExports::empty();
        }

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                errors.push(SemanticError::ModuleNotFound { path: path.display().to_string(), position: import_position });
                return ModuleExports::empty();
            }
        };

        self.in_progress.insert(path.to_path_buf());

        let file = crate::file::SourceFile::new(path, source);
        let (tokens, _lex_errors) = crate::tokenizer::tokenize(&file);
        let (mut program, _parse_errors) = crate::parser::parse(&tokens);

        let exports = match &mut program {
            Some(program) => {
                let module_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                let mut nested_errors = analyze_program(program, self, &module_dir);
                errors.append(&mut nested_errors);
                extract_exports(program)
            }
            None => ModuleExports::empty(),
        };

        self.in_progress.remove(path);
        self.cache.insert(path.to_path_buf(), exports.clone());
        exports
    }
}

/// Builds the local type environment shared by passes 1 and 2 of export
/// extraction (and reused as-is by the top-level analyzer for non-module
/// single-file analysis): seeds user-type placeholders for every
/// genus/ordo/discretio/pactum, records discretio variants, then
/// re-resolves genus and pactum member types against the full local
/// context so sibling types declared later in the file are visible.
pub fn build_known_types(program: &Program) -> IndexMap<String, SemanticType> {
    let mut known_types: IndexMap<String, SemanticType> = IndexMap::new();

    // Pass 1.
    for stmt in &program.statements {
        match stmt {
            Stmt::Genus(decl) => {
                known_types.insert(decl.name.clone(), SemanticType::User { name: decl.name.clone(), nullable: false });
            }
            Stmt::Ordo(decl) => {
                known_types.insert(
                    decl.name.clone(),
                    SemanticType::Enum { value: OrdoType { name: decl.name.clone(), members: decl.members.clone() }, nullable: false },
                );
            }
            Stmt::Discretio(decl) => {
                let mut variants = IndexMap::new();
                for variant in &decl.variants {
                    let mut fields = IndexMap::new();
                    for field in &variant.fields {
                        fields.insert(field.name.clone(), crate::semantic::resolve_type::resolve_type_expr(&field.type_annotation, &known_types));
                    }
                    variants.insert(variant.name.clone(), DiscretioVariant { name: variant.name.clone(), fields });
                }
                known_types.insert(
                    decl.name.clone(),
                    SemanticType::Discretio { value: DiscretioType { name: decl.name.clone(), variants }, nullable: false },
                );
            }
            Stmt::Pactum(decl) => {
                known_types.insert(decl.name.clone(), SemanticType::User { name: decl.name.clone(), nullable: false });
            }
            _ => {}
        }
    }

    // Pass 2.
    for stmt in &program.statements {
        if let Stmt::Genus(decl) = stmt {
            let mut fields = IndexMap::new();
            for field in &decl.fields {
                fields.insert(field.name.clone(), crate::semantic::resolve_type::resolve_type_expr(&field.type_annotation, &known_types));
            }
            let mut methods = IndexMap::new();
            for method in &decl.methods {
                methods.insert(method.name.clone(), function_type_of(method, &known_types));
            }
            known_types.insert(
                decl.name.clone(),
                SemanticType::Genus {
                    value: GenusType { name: decl.name.clone(), fields, methods, static_fields: IndexMap::new(), static_methods: IndexMap::new() },
                    nullable: false,
                },
            );
        }

        if let Stmt::Pactum(decl) = stmt {
            let mut methods = IndexMap::new();
            for method in &decl.methods {
                let params = method.params.iter().map(|p| p.type_annotation.as_ref().map(|t| crate::semantic::resolve_type::resolve_type_expr(t, &known_types)).unwrap_or(SemanticType::Unknown)).collect();
                let return_type = method.return_type.as_ref().map(|t| crate::semantic::resolve_type::resolve_type_expr(t, &known_types)).unwrap_or(SemanticType::Unknown);
                methods.insert(method.name.clone(), FunctionType { params, return_type: Box::new(return_type), is_async: false, is_generator: false });
            }
            known_types.insert(decl.name.clone(), SemanticType::Pactum { value: PactumType { name: decl.name.clone(), methods }, nullable: false });
        }
    }

    known_types
}

/// Three-pass export extraction (spec.md §4.4): passes 1 and 2 live in
/// [`build_known_types`]; pass 3 walks all exportable statements producing
/// final `ModuleExport` entries.
fn extract_exports(program: &Program) -> ModuleExports {
    let known_types = build_known_types(program);

    let mut exports = IndexMap::new();
    for stmt in &program.statements {
        match stmt {
            Stmt::FunctionDecl(decl) => {
                exports.insert(decl.name.clone(), ModuleExport { ty: SemanticType::Function { value: function_type_of(decl, &known_types), nullable: false }, kind: ExportKind::Function });
            }
            Stmt::VarDecl(decl) => {
                let ty = decl.type_annotation.as_ref().map(|t| crate::semantic::resolve_type::resolve_type_expr(t, &known_types)).unwrap_or(SemanticType::Unknown);
                exports.insert(decl.name.clone(), ModuleExport { ty, kind: ExportKind::Variable });
            }
            Stmt::TypeAlias(decl) => {
                exports.insert(decl.name.clone(), ModuleExport { ty: crate::semantic::resolve_type::resolve_type_expr(&decl.target, &known_types), kind: ExportKind::Type });
            }
            Stmt::Genus(decl) => {
                if let Some(ty) = known_types.get(&decl.name) {
                    exports.insert(decl.name.clone(), ModuleExport { ty: ty.clone(), kind: ExportKind::Genus });
                }
            }
            Stmt::Pactum(decl) => {
                if let Some(ty) = known_types.get(&decl.name) {
                    exports.insert(decl.name.clone(), ModuleExport { ty: ty.clone(), kind: ExportKind::Pactum });
                }
            }
            Stmt::Ordo(decl) => {
                if let Some(ty) = known_types.get(&decl.name) {
                    exports.insert(decl.name.clone(), ModuleExport { ty: ty.clone(), kind: ExportKind::Ordo });
                }
            }
            Stmt::Discretio(decl) => {
                if let Some(ty) = known_types.get(&decl.name) {
                    exports.insert(decl.name.clone(), ModuleExport { ty: ty.clone(), kind: ExportKind::Discretio });
                }
            }
            _ => {}
        }
    }

    ModuleExports { exports }
}

fn function_type_of(decl: &crate::ast::FunctionDecl, known_types: &IndexMap<String, SemanticType>) -> FunctionType {
    let params = decl
        .params
        .iter()
        .filter(|p| !p.is_type_param)
        .map(|p| p.type_annotation.as_ref().map(|t| crate::semantic::resolve_type::resolve_type_expr(t, known_types)).unwrap_or(SemanticType::Unknown))
        .collect();
    let return_type = decl.return_type.as_ref().map(|t| crate::semantic::resolve_type::resolve_type_expr(t, known_types)).unwrap_or(SemanticType::Unknown);
    FunctionType { params, return_type: Box::new(return_type), is_async: decl.modifiers.is_async, is_generator: decl.modifiers.is_generator }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_local_intrinsic_and_external_paths() {
        assert_eq!(classify("./sibling"), ModuleKind::Local);
        assert_eq!(classify("../parent"), ModuleKind::Local);
        assert_eq!(classify("norma"), ModuleKind::Intrinsic);
        assert_eq!(classify("norma/texta"), ModuleKind::Intrinsic);
        assert_eq!(classify("some-package"), ModuleKind::External);
    }

    #[test]
    fn local_path_resolution_appends_implicit_extension() {
        let resolved = resolve_local_path(Path::new("/project/src"), "./helper");
        assert_eq!(resolved, PathBuf::from("/project/src/helper.fab"));
    }

    #[test]
    fn cycle_reentry_yields_empty_exports_not_an_error() {
        let mut cache = ModuleCache::new();
        let path = PathBuf::from("/project/a.fab");
        cache.in_progress.insert(path.clone());
        let mut errors = Vec::new();
        let exports = cache.load(&path, Position::START, &mut errors, &mut |_, _, _| Vec::new());
        assert!(exports.exports.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn diamond_dependency_is_loaded_once() {
        // D is requested twice (once via B, once via C); the cache must
        // serve the second request without reading the file again.
        let mut cache = ModuleCache::new();
        let d_path = PathBuf::from("/project/d.fab");
        cache.cache.insert(d_path.clone(), ModuleExports::empty());
        let mut errors = Vec::new();
        let mut calls = 0;
        let exports = cache.load(&d_path, Position::START, &mut errors, &mut |_, _, _| {
            calls += 1;
            Vec::new()
        });
        assert!(exports.exports.is_empty());
        assert_eq!(calls, 0, "cached module must not be re-analyzed");
    }
}
