//! Phase 2 — *JSXReferenceBuilder* (§4.6).
//!
//! For every element whose tag begins with an upper-case letter, finds the
//! containing declaration and the component symbol, then adds a
//! `jsx_element` edge. Without this mutator, components used only in markup
//! would appear unused. Skips lower-case tags (host elements).

use crate::builder::declaration_id;
use crate::facade::IdentifierRef;
use crate::types::{EdgeKind, SymbolId};

use super::{Mutator, MutatorContext, Phase};

pub struct JsxReferenceBuilder;

fn is_component_tag(name: &str) -> bool {
    name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

impl Mutator for JsxReferenceBuilder {
    fn phase(&self) -> Phase {
        Phase::References
    }

    fn name(&self) -> &'static str {
        "JSXReferenceBuilder"
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) {
        let node_ids: Vec<SymbolId> = ctx.graph.nodes().map(|n| n.id.clone()).collect();

        for containing_id in &node_ids {
            let declarations = ctx.facade.declarations_of(&containing_id.file);
            let Some(declaration) = declarations
                .iter()
                .find(|d| declaration_id(&containing_id.file, d) == *containing_id)
            else {
                continue;
            };

            for IdentifierRef { name, line, column, in_jsx_tag_position } in &declaration.referenced_identifiers {
                if !in_jsx_tag_position || !is_component_tag(name) {
                    continue;
                }

                let local_target = SymbolId::new(containing_id.file.clone(), name.clone());
                let target = if ctx.graph.node(&local_target).is_some() {
                    Some(local_target)
                } else {
                    resolve_via_imports(ctx, &containing_id.file, name)
                };

                if let Some(target) = target {
                    ctx.add_edge(
                        containing_id.clone(),
                        target,
                        EdgeKind::JsxElement,
                        containing_id.file.clone(),
                        *line,
                        *column,
                    );
                }
            }
        }
    }
}

fn resolve_via_imports(ctx: &MutatorContext<'_>, file: &std::path::Path, name: &str) -> Option<SymbolId> {
    for import in ctx.facade.imports_of(file) {
        let matches_named = import.named.iter().any(|n| n.local == name);
        let matches_default = import.default.as_deref() == Some(name);
        if !matches_named && !matches_default {
            continue;
        }
        let resolved = ctx.facade.resolve_module(&import.specifier, file)?;
        let exported_name = import
            .named
            .iter()
            .find(|n| n.local == name)
            .map(|n| n.imported.clone())
            .unwrap_or_else(|| "default".to_string());
        return Some(SymbolId::new(resolved, exported_name));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{mock::MockFacade, mock::MockFile, DeclarationSite, ImportDecl, ImportedName};
    use crate::frameworks::FrameworkRegistry;
    use crate::graph::SymbolGraph;
    use crate::types::SymbolKind;
    use std::path::Path;

    #[test]
    fn jsx_tag_creates_edge_to_local_component() {
        let home = Path::new("/p/src/home.tsx");
        let facade = MockFacade::new().with_file(
            home,
            MockFile {
                declarations: vec![DeclarationSite {
                    qualified_name: "Home".to_string(),
                    kind: SymbolKind::Function,
                        parameters: Vec::new(),
                    line: 1,
                    column: 1,
                    exported: true,
                    parent: None,
                    decorators: vec![],
                    referenced_identifiers: vec![IdentifierRef {
                        name: "Hero".to_string(),
                        line: 3,
                        column: 5,
                        in_jsx_tag_position: true,
                    }],
                }],
                ..Default::default()
            },
        );

        let mut graph = SymbolGraph::new();
        let home_id = SymbolId::new(home, "Home");
        let hero_id = SymbolId::new(home, "Hero");
        graph.upsert_node(home_id.clone(), SymbolKind::Function, 1, 1);
        graph.upsert_node(hero_id.clone(), SymbolKind::Function, 5, 1);

        let registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        JsxReferenceBuilder.run(&mut ctx);

        assert!(ctx.graph.outgoing(&home_id).any(|t| t == &hero_id));
    }

    #[test]
    fn lowercase_host_elements_are_skipped() {
        let home = Path::new("/p/src/home.tsx");
        let facade = MockFacade::new().with_file(
            home,
            MockFile {
                declarations: vec![DeclarationSite {
                    qualified_name: "Home".to_string(),
                    kind: SymbolKind::Function,
                        parameters: Vec::new(),
                    line: 1,
                    column: 1,
                    exported: true,
                    parent: None,
                    decorators: vec![],
                    referenced_identifiers: vec![IdentifierRef {
                        name: "div".to_string(),
                        line: 3,
                        column: 5,
                        in_jsx_tag_position: true,
                    }],
                }],
                ..Default::default()
            },
        );

        let mut graph = SymbolGraph::new();
        let home_id = SymbolId::new(home, "Home");
        graph.upsert_node(home_id.clone(), SymbolKind::Function, 1, 1);

        let registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        JsxReferenceBuilder.run(&mut ctx);

        assert_eq!(ctx.graph.edge_count(), 0);
    }

    #[test]
    fn jsx_tag_resolves_through_import() {
        let home = Path::new("/p/src/home.tsx");
        let hero = Path::new("/p/src/hero.tsx");
        let facade = MockFacade::new()
            .with_file(
                home,
                MockFile {
                    imports: vec![ImportDecl {
                        specifier: "./hero".to_string(),
                        named: vec![ImportedName { imported: "Hero".to_string(), local: "Hero".to_string(), type_only: false }],
                        default: None,
                        namespace: None,
                        type_only: false,
                        line: 1,
                    }],
                    declarations: vec![DeclarationSite {
                        qualified_name: "Home".to_string(),
                        kind: SymbolKind::Function,
                        parameters: Vec::new(),
                        line: 2,
                        column: 1,
                        exported: true,
                        parent: None,
                        decorators: vec![],
                        referenced_identifiers: vec![IdentifierRef {
                            name: "Hero".to_string(),
                            line: 3,
                            column: 5,
                            in_jsx_tag_position: true,
                        }],
                    }],
                    ..Default::default()
                },
            )
            .with_resolution("./hero", home, hero);

        let mut graph = SymbolGraph::new();
        let home_id = SymbolId::new(home, "Home");
        let hero_id = SymbolId::new(hero, "Hero");
        graph.upsert_node(home_id.clone(), SymbolKind::Function, 2, 1);
        graph.upsert_node(hero_id.clone(), SymbolKind::Function, 1, 1);

        let registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        JsxReferenceBuilder.run(&mut ctx);

        assert!(ctx.graph.outgoing(&home_id).any(|t| t == &hero_id));
    }

    #[test]
    fn jsx_in_class_method_body_creates_edge() {
        // Matches `OxcFacade`'s real shape for a class member (oxc.rs:461): a
        // bare `qualified_name` plus `parent: Some(..)`, so the containing
        // node id is the dotted `Widget.render` reconstructed by `declaration_id`.
        let widget = Path::new("/p/src/widget.tsx");
        let facade = MockFacade::new().with_file(
            widget,
            MockFile {
                declarations: vec![DeclarationSite {
                    qualified_name: "render".to_string(),
                    kind: SymbolKind::Method,
                    parameters: Vec::new(),
                    line: 2,
                    column: 1,
                    exported: false,
                    parent: Some("Widget".to_string()),
                    decorators: vec![],
                    referenced_identifiers: vec![IdentifierRef {
                        name: "Hero".to_string(),
                        line: 3,
                        column: 5,
                        in_jsx_tag_position: true,
                    }],
                }],
                ..Default::default()
            },
        );

        let mut graph = SymbolGraph::new();
        let render_id = SymbolId::new(widget, "Widget").child("render");
        let hero_id = SymbolId::new(widget, "Hero");
        graph.upsert_node(render_id.clone(), SymbolKind::Method, 2, 1);
        graph.upsert_node(hero_id.clone(), SymbolKind::Function, 5, 1);

        let registry = FrameworkRegistry::build(&[], Path::new("/p"), &serde_json::json!({}));
        let config = crate::config::Configuration::default();
        let mut ctx = MutatorContext {
            graph: &mut graph,
            facade: &facade,
            project_root: Path::new("/p"),
            frameworks: &registry,
            config: &config,
        };
        JsxReferenceBuilder.run(&mut ctx);

        assert!(ctx.graph.outgoing(&render_id).any(|t| t == &hero_id));
    }
}
