//! Phase 3 — *DecoratorRetainer* (§4.6).
//!
//! Marks classes, methods, and properties whose decorators intersect a
//! retention table as retained: a union of every detected framework's
//! `retain_decorators`, plus the configuration's own `retain_decorators`
//! list, plus (if `retain_all_decorated` is set) every decorated symbol
//! regardless of which decorator it carries.

use crate::builder::declaration_id;
use crate::types::SymbolId;

use super::{Mutator, MutatorContext, Phase};

pub struct DecoratorRetainer;

impl Mutator for DecoratorRetainer {
    fn phase(&self) -> Phase {
        Phase::Retention
    }

    fn name(&self) -> &'static str {
        "DecoratorRetainer"
    }

    fn run(&self, ctx: &mut MutatorContext<'_>) {
        let mut retain_set = ctx.frameworks.retain_decorators.clone();
        retain_set.extend(ctx.config.retain_decorators.iter().cloned());
        let retain_all = ctx.config.retain_all_decorated;

        let node_ids: Vec<SymbolId> = ctx.graph.nodes().map(|n| n.id.clone()).collect();
        for id in node_ids {
            let declarations = ctx.facade.declarations_of(&id.file);
            let Some(declaration) = declarations.iter().find(|d| declaration_id(&id.file, d) == id) else {
                continue;
            };
            if declaration.decorators.is_empty() {
                continue;
            }

            let matched = declaration
                .decorators
                .iter()
                .find(|d| retain_all || retain_set.contains(d.as_str()));

            if let Some(decorator) = matched {
                ctx.mark_retained(&id, format!("decorated with @{}", decorator));
            }
        }
    }
}
