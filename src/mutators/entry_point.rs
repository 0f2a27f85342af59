//! Phase 1 — *EntryPointRetainer* (§4.6).
//!
//! Marks exported symbols whose `(relative_file, export_name)` matches a
//! detected framework's entry pattern, marks module-level nodes of
//! framework-route-style modules as entry, and marks every symbol in an
//! "app entry file" as entry regardless of export status.

use std::path::Path;

use globset::Glob;

use crate::frameworks::ExportNames;
use crate::types::SymbolId;

use super::{Mutator, MutatorContext, Phase};

pub struct EntryPointRetainer;

/// Basenames whose top-level code always executes, independent of imports.
const APP_ENTRY_BASENAMES: &[&str] = &["index", "main", "app", "server", "worker"];

fn is_app_entry_file(file: &Path) -> bool {
    file.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| APP_ENTRY_BASENAMES.contains(&stem))
        .unwrap_or(false)
}

impl Mutator for EntryPointRetainer {
    fn phase(&self) -> Phase {
        Phase::EntryPoints
    }

    fn name(&self) -> &'static str {
        "EntryPointRetainer"
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) {
        let root = ctx.project_root.to_path_buf();
        let patterns = ctx.frameworks.entry_patterns.clone();

        let node_ids: Vec<SymbolId> = ctx.graph.nodes().map(|n| n.id.clone()).collect();
        for id in node_ids {
            let relative = id.file.strip_prefix(&root).unwrap_or(&id.file);

            if is_app_entry_file(&id.file) {
                ctx.mark_entry_point(&id, format!("app entry file {}", relative.display()));
                continue;
            }

            let exported = ctx.graph.node(&id).map(|n| n.exported).unwrap_or(false);
            for pattern in &patterns {
                let Ok(glob) = Glob::new(&pattern.glob) else { continue };
                if !glob.compile_matcher().is_match(relative) {
                    continue;
                }
                if id.is_module_root() {
                    ctx.mark_entry_point(&id, format!("framework entry module {}", pattern.glob));
                    continue;
                }
                if !exported {
                    continue;
                }
                let matches_export = match &pattern.exports {
                    ExportNames::All => true,
                    ExportNames::Named(names) => names.iter().any(|n| n == &id.qualified_name),
                };
                if matches_export {
                    ctx.mark_entry_point(
                        &id,
                        format!("{} export matches entry pattern {}", id.qualified_name, pattern.glob),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frameworks::{EntryPattern, FrameworkRegistry};
    use crate::graph::SymbolGraph;
    use crate::types::SymbolKind;

    fn registry_with_pattern(glob: &str, exports: ExportNames) -> FrameworkRegistry {
        let mut registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        registry.entry_patterns = vec![EntryPattern { glob: glob.to_string(), exports }];
        registry
    }

    #[test]
    fn marks_exported_symbol_matching_entry_pattern() {
        let mut graph = SymbolGraph::new();
        let id = SymbolId::new("/p/src/routes/home.tsx", "Home");
        graph.upsert_node(id.clone(), SymbolKind::Function, 1, 1).exported = true;

        let registry = registry_with_pattern(
            "src/routes/**",
            ExportNames::Named(vec!["Home".to_string()]),
        );
        let facade = crate::facade::mock::MockFacade::new();
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        EntryPointRetainer.run(&mut ctx);

        assert!(ctx.graph.node(&id).unwrap().is_entry_point);
    }

    #[test]
    fn app_entry_file_marks_non_exported_symbols() {
        let mut graph = SymbolGraph::new();
        let id = SymbolId::new("/p/src/index.ts", "bootstrap");
        graph.upsert_node(id.clone(), SymbolKind::Function, 1, 1);

        let registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        let facade = crate::facade::mock::MockFacade::new();
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        EntryPointRetainer.run(&mut ctx);

        assert!(ctx.graph.node(&id).unwrap().is_entry_point);
    }

    #[test]
    fn non_matching_file_is_left_alone() {
        let mut graph = SymbolGraph::new();
        let id = SymbolId::new("/p/src/util.ts", "helper");
        graph.upsert_node(id.clone(), SymbolKind::Function, 1, 1).exported = true;

        let registry = registry_with_pattern("src/routes/**", ExportNames::All);
        let facade = crate::facade::mock::MockFacade::new();
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        EntryPointRetainer.run(&mut ctx);

        assert!(!ctx.graph.node(&id).unwrap().is_entry_point);
    }
}
