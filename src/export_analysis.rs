//! Module-Boundary Export Analysis (C7, §4.7).
//!
//! Complements the intra-project call graph with a whole-module view that
//! catches exports never imported by any reachable module, including types.
//! Grounded on the re-export/barrel propagation logic in the teacher's dead
//! parrots module (`used_exports: HashSet<(String, String)>`, star vs named
//! re-export handling, `uses_all` as the teacher's `"*"`-marker insertion)
//! and on its barrel-detection helper.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::UnusedExportedMode;
use crate::facade::CompilerFacade;
use crate::resolver::ModuleResolver;
use crate::types::{ExportProvenance, FileUsage};

/// A file is a barrel when its basename is `index.*` or it contains any
/// export with a module specifier (named re-export or star re-export).
pub fn is_barrel(file: &Path, facade: &dyn CompilerFacade) -> bool {
    let stem_is_index = file.file_stem().and_then(|s| s.to_str()) == Some("index");
    stem_is_index || facade.exports_of(file).iter().any(|e| e.reexport_from.is_some())
}

/// Step 1 — collect exports for every reachable file (§4.7.1). In `Barrels`
/// mode the caller passes only the files `is_barrel` selected.
pub fn collect_exports(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    files: &HashSet<PathBuf>,
) -> HashMap<PathBuf, ExportProvenance> {
    let mut result = HashMap::new();

    for file in files {
        let mut provenance = ExportProvenance::default();
        let declarations = facade.declarations_of(file);

        for export in facade.exports_of(file) {
            if export.is_star {
                if let Some(target) = resolver.resolve(export.reexport_from.as_deref().unwrap_or(""), file) {
                    provenance.star_reexport_targets.insert(target);
                }
                continue;
            }

            let is_type = export.is_type
                || declarations
                    .iter()
                    .find(|d| d.qualified_name == export.name)
                    .map(|d| {
                        matches!(d.kind, crate::types::SymbolKind::Interface | crate::types::SymbolKind::Type)
                    })
                    .unwrap_or(false);

            if is_type {
                provenance.type_exports.insert(export.name.clone());
            } else {
                provenance.value_exports.insert(export.name.clone());
            }

            if let Some(specifier) = &export.reexport_from {
                if let Some(origin_file) = resolver.resolve(specifier, file) {
                    let origins = if is_type {
                        provenance.type_origins.entry(export.name.clone()).or_default()
                    } else {
                        provenance.value_origins.entry(export.name.clone()).or_default()
                    };
                    origins.push((origin_file, export.name.clone()));
                }
            }
        }

        result.insert(file.clone(), provenance);
    }

    result
}

/// Step 2 — collect usage from every reachable file's import declarations
/// (§4.7.2). Default and namespace imports set `uses_all` on the target:
/// without inspecting the importer it is unsafe to track specific names.
pub fn collect_usage(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    files: &HashSet<PathBuf>,
) -> HashMap<PathBuf, FileUsage> {
    let mut result: HashMap<PathBuf, FileUsage> = HashMap::new();

    for file in files {
        for import in facade.imports_of(file) {
            let Some(target) = resolver.resolve(&import.specifier, file) else { continue };
            let usage = result.entry(target).or_default();

            if import.default.is_some() || import.namespace.is_some() {
                usage.uses_all = true;
            }
            for named in &import.named {
                if named.type_only || import.type_only {
                    usage.used_types.insert(named.imported.clone());
                } else {
                    usage.used_values.insert(named.imported.clone());
                }
            }
        }
    }

    result
}

/// Step 3 — fixpoint propagation (§4.7.3). Namespace/default imports mark
/// every local export used; used names propagate to named re-export
/// origins; names arriving via a star re-export are marked used in any star
/// target that actually defines them.
pub fn propagate(provenance: &HashMap<PathBuf, ExportProvenance>, usage: &mut HashMap<PathBuf, FileUsage>) {
    loop {
        let mut changed = false;

        for (file, prov) in provenance {
            let uses_all = usage.get(file).map(|u| u.uses_all).unwrap_or(false);
            if uses_all {
                let entry = usage.entry(file.clone()).or_default();
                for name in &prov.value_exports {
                    changed |= entry.used_values.insert(name.clone());
                }
                for name in &prov.type_exports {
                    changed |= entry.used_types.insert(name.clone());
                }
            }

            let used_values: Vec<String> =
                usage.get(file).map(|u| u.used_values.iter().cloned().collect()).unwrap_or_default();
            for name in used_values {
                if let Some(origins) = prov.value_origins.get(&name) {
                    for (origin_file, origin_name) in origins {
                        let entry = usage.entry(origin_file.clone()).or_default();
                        changed |= entry.used_values.insert(origin_name.clone());
                    }
                }
            }

            let used_types: Vec<String> =
                usage.get(file).map(|u| u.used_types.iter().cloned().collect()).unwrap_or_default();
            for name in used_types {
                if let Some(origins) = prov.type_origins.get(&name) {
                    for (origin_file, origin_name) in origins {
                        let entry = usage.entry(origin_file.clone()).or_default();
                        changed |= entry.used_types.insert(origin_name.clone());
                    }
                }
            }

            for target in &prov.star_reexport_targets {
                let Some(target_prov) = provenance.get(target) else { continue };
                let (forwarded_values, forwarded_types): (Vec<String>, Vec<String>) = (
                    usage.get(file).map(|u| u.used_values.iter().cloned().collect()).unwrap_or_default(),
                    usage.get(file).map(|u| u.used_types.iter().cloned().collect()).unwrap_or_default(),
                );
                let target_entry = usage.entry(target.clone()).or_default();
                for name in &forwarded_values {
                    if target_prov.value_exports.contains(name) {
                        changed |= target_entry.used_values.insert(name.clone());
                    }
                }
                for name in &forwarded_types {
                    if target_prov.type_exports.contains(name) {
                        changed |= target_entry.used_types.insert(name.clone());
                    }
                }
            }
        }

        if !changed {
            break;
        }
    }
}

/// Result of C7: per-file provenance and usage, ready for the `UnusedExported`
/// / `UnusedExportedType` detectors (§4.9).
pub struct ExportAnalysis {
    pub provenance: HashMap<PathBuf, ExportProvenance>,
    pub usage: HashMap<PathBuf, FileUsage>,
}

/// Run C7 end-to-end. `skip_reporting` is supplied by the caller (the set of
/// files that are framework entries, per §4.7 "conservative choices").
pub fn run(
    facade: &dyn CompilerFacade,
    resolver: &dyn ModuleResolver,
    reachable: &HashSet<PathBuf>,
    mode: UnusedExportedMode,
    skip_reporting: &HashSet<PathBuf>,
) -> Option<ExportAnalysis> {
    if mode == UnusedExportedMode::Off {
        return None;
    }

    let scope: HashSet<PathBuf> = if mode == UnusedExportedMode::Barrels {
        reachable.iter().filter(|f| is_barrel(f, facade)).cloned().collect()
    } else {
        reachable.clone()
    };

    let mut provenance = collect_exports(facade, resolver, &scope);
    for (file, prov) in provenance.iter_mut() {
        prov.skip_reporting = skip_reporting.contains(file);
    }
    let mut usage = collect_usage(facade, resolver, &scope);
    propagate(&provenance, &mut usage);

    Some(ExportAnalysis { provenance, usage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::mock::{MockFacade, MockFile};
    use crate::facade::{ExportDecl, ImportDecl, ImportedName};
    use std::collections::HashMap as Map;

    struct MapResolver(Map<(String, PathBuf), PathBuf>);
    impl ModuleResolver for MapResolver {
        fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
            self.0.get(&(specifier.to_string(), containing_file.to_path_buf())).cloned()
        }
    }

    #[test]
    fn namespace_import_marks_every_export_used() {
        let util = PathBuf::from("/p/src/util.ts");
        let entry = PathBuf::from("/p/src/entry.ts");

        let facade = MockFacade::new()
            .with_file(
                &util,
                MockFile {
                    exports: vec![
                        ExportDecl { name: "a".into(), is_type: false, line: 1, reexport_from: None, is_star: false, star_alias: None },
                        ExportDecl { name: "b".into(), is_type: false, line: 2, reexport_from: None, is_star: false, star_alias: None },
                        ExportDecl { name: "c".into(), is_type: false, line: 3, reexport_from: None, is_star: false, star_alias: None },
                    ],
                    ..Default::default()
                },
            )
            .with_file(
                &entry,
                MockFile {
                    imports: vec![ImportDecl {
                        specifier: "./util".into(),
                        named: vec![],
                        default: None,
                        namespace: Some("U".into()),
                        type_only: false,
                        line: 1,
                    }],
                    ..Default::default()
                },
            );

        let mut map = Map::new();
        map.insert(("./util".to_string(), entry.clone()), util.clone());
        let resolver = MapResolver(map);

        let reachable: HashSet<PathBuf> = [util.clone(), entry.clone()].into_iter().collect();
        let analysis = run(&facade, &resolver, &reachable, UnusedExportedMode::All, &HashSet::new()).unwrap();

        let usage = analysis.usage.get(&util).unwrap();
        assert!(usage.used_values.contains("a"));
        assert!(usage.used_values.contains("b"));
        assert!(usage.used_values.contains("c"));
    }

    #[test]
    fn named_reexport_chain_propagates_to_origin() {
        let a = PathBuf::from("/p/src/a.ts");
        let b = PathBuf::from("/p/src/b.ts");
        let c = PathBuf::from("/p/src/c.ts");

        let facade = MockFacade::new()
            .with_file(
                &a,
                MockFile {
                    exports: vec![ExportDecl { name: "Thing".into(), is_type: false, line: 1, reexport_from: None, is_star: false, star_alias: None }],
                    ..Default::default()
                },
            )
            .with_file(
                &b,
                MockFile {
                    exports: vec![ExportDecl { name: "Thing".into(), is_type: false, line: 1, reexport_from: Some("./a".into()), is_star: false, star_alias: None }],
                    ..Default::default()
                },
            )
            .with_file(
                &c,
                MockFile {
                    imports: vec![ImportDecl {
                        specifier: "./b".into(),
                        named: vec![ImportedName { imported: "Thing".into(), local: "Thing".into(), type_only: false }],
                        default: None,
                        namespace: None,
                        type_only: false,
                        line: 1,
                    }],
                    ..Default::default()
                },
            );

        let mut map = Map::new();
        map.insert(("./a".to_string(), b.clone()), a.clone());
        map.insert(("./b".to_string(), c.clone()), b.clone());
        let resolver = MapResolver(map);

        let reachable: HashSet<PathBuf> = [a.clone(), b.clone(), c.clone()].into_iter().collect();
        let analysis = run(&facade, &resolver, &reachable, UnusedExportedMode::All, &HashSet::new()).unwrap();

        assert!(analysis.usage.get(&a).unwrap().used_values.contains("Thing"));
    }

    #[test]
    fn entry_files_are_skip_reporting() {
        let entry = PathBuf::from("/p/src/index.ts");
        let facade = MockFacade::new().with_file(
            &entry,
            MockFile {
                exports: vec![ExportDecl { name: "unused".into(), is_type: false, line: 1, reexport_from: None, is_star: false, star_alias: None }],
                ..Default::default()
            },
        );
        let resolver = MapResolver(Map::new());
        let reachable: HashSet<PathBuf> = [entry.clone()].into_iter().collect();
        let skip: HashSet<PathBuf> = [entry.clone()].into_iter().collect();

        let analysis = run(&facade, &resolver, &reachable, UnusedExportedMode::All, &skip).unwrap();
        assert!(analysis.provenance.get(&entry).unwrap().skip_reporting);
    }

    #[test]
    fn off_mode_returns_none() {
        let facade = MockFacade::new();
        let resolver = MapResolver(Map::new());
        assert!(run(&facade, &resolver, &HashSet::new(), UnusedExportedMode::Off, &HashSet::new()).is_none());
    }
}
