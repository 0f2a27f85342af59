//! Framework Registry (C3, §4.3).
//!
//! A framework detector is a plug-in value offering `detect`, `entry_config`,
//! and an optional `retain_decorators` set. The registry aggregates every
//! detected framework's config into one unioned view. New detectors are added
//! by appending to `builtin_detectors()`; nothing else in the crate needs to
//! change (§9 "extensibility via message passing, not inheritance").

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::Path;

/// Which export names an entry pattern marks as conventionally used.
#[derive(Debug, Clone)]
pub enum ExportNames {
    /// Every export in a matching file counts as used by convention.
    All,
    Named(Vec<String>),
}

/// One `(glob pattern, exports-touched-by-convention)` mapping contributed by
/// a detected framework.
#[derive(Debug, Clone)]
pub struct EntryPattern {
    pub glob: String,
    pub exports: ExportNames,
}

/// What a framework detector contributes once its framework is detected.
#[derive(Debug, Clone, Default)]
pub struct FrameworkEntryConfig {
    pub entry_patterns: Vec<EntryPattern>,
    pub ignore_patterns: Vec<String>,
    pub retain_decorators: HashSet<String>,
}

/// A pluggable framework detector (§4.3).
pub trait FrameworkDetector: Send + Sync {
    fn name(&self) -> &'static str;
    /// Purely a manifest inspection: does this project depend on the framework?
    fn detect(&self, project_root: &Path, manifest: &JsonValue) -> Option<String>;
    fn entry_config(&self) -> FrameworkEntryConfig;
}

fn has_dependency(manifest: &JsonValue, name: &str) -> Option<String> {
    for section in ["dependencies", "devDependencies", "peerDependencies"] {
        if let Some(version) = manifest.get(section).and_then(|v| v.get(name)).and_then(|v| v.as_str()) {
            return Some(version.to_string());
        }
    }
    None
}

/// A test framework (Jest/Vitest-shaped): test files are entry points whose
/// exports are consumed by the test runner, not by project imports.
pub struct TestFrameworkDetector;

impl FrameworkDetector for TestFrameworkDetector {
    fn name(&self) -> &'static str {
        "test-framework"
    }

    fn detect(&self, _root: &Path, manifest: &JsonValue) -> Option<String> {
        has_dependency(manifest, "vitest")
            .or_else(|| has_dependency(manifest, "jest"))
            .or_else(|| has_dependency(manifest, "@jest/core"))
    }

    fn entry_config(&self) -> FrameworkEntryConfig {
        FrameworkEntryConfig {
            entry_patterns: vec![
                EntryPattern { glob: "**/*.test.*".into(), exports: ExportNames::All },
                EntryPattern { glob: "**/*.spec.*".into(), exports: ExportNames::All },
                EntryPattern { glob: "**/__tests__/**".into(), exports: ExportNames::All },
            ],
            ignore_patterns: vec!["**/*.test.*".into(), "**/*.spec.*".into()],
            retain_decorators: HashSet::new(),
        }
    }
}

/// A file-based router (Next.js/Remix/SvelteKit-shaped): files under a routes
/// directory are entries, and their conventional exports (`default`, HTTP verb
/// handlers, `loader`/`action`) are used by the framework's runtime, not by
/// explicit project imports.
pub struct FileRoutingDetector;

impl FrameworkDetector for FileRoutingDetector {
    fn name(&self) -> &'static str {
        "file-routing"
    }

    fn detect(&self, root: &Path, _manifest: &JsonValue) -> Option<String> {
        for marker in ["next.config.js", "next.config.ts", "next.config.mjs", "remix.config.js", "svelte.config.js"] {
            if root.join(marker).exists() {
                return Some(marker.to_string());
            }
        }
        None
    }

    fn entry_config(&self) -> FrameworkEntryConfig {
        FrameworkEntryConfig {
            entry_patterns: vec![
                EntryPattern {
                    glob: "**/{app,pages,routes}/**/*.{ts,tsx,js,jsx}".into(),
                    exports: ExportNames::Named(vec![
                        "default".into(), "GET".into(), "POST".into(), "PUT".into(),
                        "PATCH".into(), "DELETE".into(), "loader".into(), "action".into(),
                        "load".into(), "getServerSideProps".into(), "getStaticProps".into(),
                        "generateStaticParams".into(), "metadata".into(),
                    ]),
                },
            ],
            ignore_patterns: vec![],
            retain_decorators: HashSet::new(),
        }
    }
}

/// A server framework (Express/Fastify/Nest-shaped): the process entry file is
/// always an entry, and dependency-injected/route-decorated classes are
/// retained by their decorators.
pub struct ServerFrameworkDetector;

impl FrameworkDetector for ServerFrameworkDetector {
    fn name(&self) -> &'static str {
        "server-framework"
    }

    fn detect(&self, _root: &Path, manifest: &JsonValue) -> Option<String> {
        has_dependency(manifest, "express")
            .or_else(|| has_dependency(manifest, "fastify"))
            .or_else(|| has_dependency(manifest, "@nestjs/core"))
    }

    fn entry_config(&self) -> FrameworkEntryConfig {
        let mut retain_decorators = HashSet::new();
        for name in ["Controller", "Injectable", "Module", "Get", "Post", "Put", "Delete", "Patch"] {
            retain_decorators.insert(name.to_string());
        }
        FrameworkEntryConfig {
            entry_patterns: vec![
                EntryPattern { glob: "**/{server,index,main}.{ts,js}".into(), exports: ExportNames::All },
            ],
            ignore_patterns: vec![],
            retain_decorators,
        }
    }
}

/// A schema/ORM library (Prisma/TypeORM/Drizzle-shaped): schema files are
/// entries and decorated entity/column members are retained.
pub struct SchemaOrmDetector;

impl FrameworkDetector for SchemaOrmDetector {
    fn name(&self) -> &'static str {
        "schema-orm"
    }

    fn detect(&self, _root: &Path, manifest: &JsonValue) -> Option<String> {
        has_dependency(manifest, "typeorm")
            .or_else(|| has_dependency(manifest, "drizzle-orm"))
            .or_else(|| has_dependency(manifest, "@prisma/client"))
    }

    fn entry_config(&self) -> FrameworkEntryConfig {
        let mut retain_decorators = HashSet::new();
        for name in ["Entity", "Column", "PrimaryGeneratedColumn", "OneToMany", "ManyToOne", "ManyToMany"] {
            retain_decorators.insert(name.to_string());
        }
        FrameworkEntryConfig {
            entry_patterns: vec![
                EntryPattern { glob: "**/*.entity.{ts,js}".into(), exports: ExportNames::All },
                EntryPattern { glob: "**/schema.{ts,js}".into(), exports: ExportNames::All },
            ],
            ignore_patterns: vec![],
            retain_decorators,
        }
    }
}

/// Minimum set required for correctness by §4.3: a test framework, a routing
/// framework, a server framework, and a schema/ORM library.
pub fn builtin_detectors() -> Vec<Box<dyn FrameworkDetector>> {
    vec![
        Box::new(TestFrameworkDetector),
        Box::new(FileRoutingDetector),
        Box::new(ServerFrameworkDetector),
        Box::new(SchemaOrmDetector),
    ]
}

/// Aggregated, unioned view across every detector whose framework was found
/// in this project (§4.3 "the registry aggregates all detected frameworks'
/// configs: union of patterns, union of ignore patterns").
pub struct FrameworkRegistry {
    pub detected: Vec<String>,
    pub entry_patterns: Vec<EntryPattern>,
    pub ignore_set: GlobSet,
    pub retain_decorators: HashSet<String>,
}

impl FrameworkRegistry {
    pub fn build(
        detectors: &[Box<dyn FrameworkDetector>],
        project_root: &Path,
        manifest: &JsonValue,
    ) -> Self {
        let mut detected = Vec::new();
        let mut entry_patterns = Vec::new();
        let mut ignore_patterns = Vec::new();
        let mut retain_decorators = HashSet::new();

        for detector in detectors {
            if let Some(version) = detector.detect(project_root, manifest) {
                detected.push(format!("{} ({})", detector.name(), version));
                let config = detector.entry_config();
                entry_patterns.extend(config.entry_patterns);
                ignore_patterns.extend(config.ignore_patterns);
                retain_decorators.extend(config.retain_decorators);
            }
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        let ignore_set = builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

        Self { detected, entry_patterns, ignore_set, retain_decorators }
    }

    pub fn is_empty(&self) -> bool {
        self.detected.is_empty()
    }
}
