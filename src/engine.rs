//! Engine orchestration (ties C1-C10 plus B1/B2 together).
//!
//! `run` is the single entry point the binary calls: build reachability,
//! build the symbol graph, run the mutator pipeline, run the module-boundary
//! export analysis and the dependency analyzer, run every detector, then
//! apply the suppression layer and sort. Nothing downstream of `run` needs
//! to know about any of the individual components.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::export_analysis::{self, ExportAnalysis};
use crate::facade::CompilerFacade;
use crate::frameworks::{builtin_detectors, FrameworkRegistry};
use crate::graph::SymbolGraph;
use crate::manifest::Manifest;
use crate::mutators::decorator::DecoratorRetainer;
use crate::mutators::entry_point::EntryPointRetainer;
use crate::mutators::jsx::JsxReferenceBuilder;
use crate::mutators::marker::UsedDeclarationMarker;
use crate::mutators::{run_pipeline, Mutator, MutatorContext};
use crate::resolver::ModuleResolver;
use crate::{builder, dependency_analyzer, detectors, ignore, reachability};
use crate::types::Issue;

/// Resolves through whatever front end the caller chose, by delegating to
/// `CompilerFacade::resolve_module`. Every C1-C8 component takes a
/// `&dyn ModuleResolver` rather than a `&dyn CompilerFacade` directly, so the
/// engine wires this adapter once instead of threading the facade itself
/// through every signature.
struct FacadeResolver<'a> {
    facade: &'a dyn CompilerFacade,
}

impl<'a> ModuleResolver for FacadeResolver<'a> {
    fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        self.facade.resolve_module(specifier, containing_file)
    }
}

fn is_stylesheet(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("css") | Some("scss") | Some("less"))
}

/// Everything the detector suite (C9) reads to produce issues, plus the
/// intermediate results of C1-C8 a caller might want to inspect directly
/// (the `fix` / `baseline` subcommands read `dependency_issues` and the
/// final issue list; nothing outside this module reads `graph` or
/// `export_analysis` today, but they're public for that reason).
pub struct EngineContext<'a> {
    pub root: PathBuf,
    pub facade: &'a dyn CompilerFacade,
    pub resolver: Box<dyn ModuleResolver + 'a>,
    pub config: Configuration,
    pub frameworks: FrameworkRegistry,
    pub graph: SymbolGraph,
    pub candidates: HashSet<PathBuf>,
    pub entries: HashSet<PathBuf>,
    pub reachable: HashSet<PathBuf>,
    pub export_analysis: Option<ExportAnalysis>,
    pub manifest: Option<Manifest>,
    pub dependency_issues: Vec<Issue>,
}

impl<'a> EngineContext<'a> {
    #[cfg(test)]
    pub fn for_test(root: &Path, facade: &'a dyn CompilerFacade) -> EngineContext<'a> {
        EngineContext {
            root: root.to_path_buf(),
            facade,
            resolver: Box::new(FacadeResolver { facade }),
            config: Configuration::default(),
            frameworks: FrameworkRegistry::build(&[], root, &serde_json::json!({})),
            graph: SymbolGraph::new(),
            candidates: HashSet::new(),
            entries: HashSet::new(),
            reachable: HashSet::new(),
            export_analysis: None,
            manifest: None,
            dependency_issues: Vec::new(),
        }
    }
}

/// Sort the final issue list for stable, reviewable output: file, then line,
/// column, kind, name.
fn sort_issues(root: &Path, issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        let ra = a.file.strip_prefix(root).unwrap_or(&a.file);
        let rb = b.file.strip_prefix(root).unwrap_or(&b.file);
        (ra, a.line, a.column, a.kind, &a.name).cmp(&(rb, b.line, b.column, b.kind, &b.name))
    });
}

/// Run the full pipeline against a project rooted at `root`, using `facade`
/// as the only source of parsed-source information.
pub fn run(root: &Path, facade: &dyn CompilerFacade) -> Vec<Issue> {
    let manifest = Manifest::load(root);
    let raw_manifest = manifest
        .as_ref()
        .and_then(|m| std::fs::read_to_string(&m.path).ok())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| serde_json::json!({}));

    let config = Configuration::load(root);
    let frameworks = FrameworkRegistry::build(&builtin_detectors(), root, &raw_manifest);
    let resolver = FacadeResolver { facade };

    let files = facade.list_source_files();
    let reachability_result = reachability::run(
        &files,
        root,
        &frameworks,
        config.unused_exported_ignore_generated,
        &resolver,
        |file| facade.imports_of(file).into_iter().map(|i| i.specifier).collect(),
    );

    let mut graph = builder::build_graph(facade, &resolver, &reachability_result.reachable);

    let mutators: Vec<Box<dyn Mutator>> = vec![
        Box::new(EntryPointRetainer),
        Box::new(JsxReferenceBuilder),
        Box::new(DecoratorRetainer),
        Box::new(UsedDeclarationMarker),
    ];
    let mut mutator_ctx = MutatorContext {
        graph: &mut graph,
        facade,
        project_root: root,
        frameworks: &frameworks,
        config: &config,
    };
    run_pipeline(&mutators, &mut mutator_ctx);

    let export_analysis = export_analysis::run(
        facade,
        &resolver,
        &reachability_result.reachable,
        config.unused_exported,
        &reachability_result.entries,
    );

    let dependency_analysis = dependency_analyzer::run(
        root,
        &reachability_result.reachable,
        manifest.as_ref(),
        facade,
        &resolver,
        |file| if is_stylesheet(file) { std::fs::read_to_string(file).ok() } else { None },
    );

    let mut dependency_issues = dependency_analysis.issues;
    if let Some(manifest) = &manifest {
        dependency_issues.extend(dependency_analyzer::derive_issues(manifest, &dependency_analysis.usages));
    }

    let ctx = EngineContext {
        root: root.to_path_buf(),
        facade,
        resolver: Box::new(resolver),
        config,
        frameworks,
        graph,
        candidates: reachability_result.candidates,
        entries: reachability_result.entries,
        reachable: reachability_result.reachable,
        export_analysis,
        manifest,
        dependency_issues,
    };

    let issues = detectors::run_all(&ctx);
    let mut issues = ignore::apply(&ctx.root, &ctx.config, issues, |file| std::fs::read_to_string(file).ok());
    sort_issues(&ctx.root, &mut issues);
    issues
}
