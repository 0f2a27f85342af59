//! Mutator Pipeline (C6, §4.6).
//!
//! Runs in four named phases; each mutator declares a phase and a priority
//! within that phase. Execution order is phase order, then ascending priority.
//! Adding a mutator must not require changes elsewhere (§9): new passes
//! declare their own phase/priority and receive the same `MutatorContext`.

pub mod decorator;
pub mod entry_point;
pub mod jsx;
pub mod marker;

use std::path::Path;

use crate::config::Configuration;
use crate::facade::CompilerFacade;
use crate::frameworks::FrameworkRegistry;
use crate::graph::SymbolGraph;
use crate::types::{EdgeKind, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    EntryPoints,
    References,
    Retention,
    Marking,
}

/// Context handed to every mutator: the graph, compiler facade, project root,
/// detected frameworks, configuration, and the four convenience calls named
/// in §4.6.
pub struct MutatorContext<'a> {
    pub graph: &'a mut SymbolGraph,
    pub facade: &'a dyn CompilerFacade,
    pub project_root: &'a Path,
    pub frameworks: &'a FrameworkRegistry,
    pub config: &'a Configuration,
}

impl<'a> MutatorContext<'a> {
    pub fn mark_entry_point(&mut self, id: &SymbolId, reason: impl Into<String>) {
        if let Some(symbol) = self.graph.node_mut(id) {
            symbol.mark_entry(reason);
        }
    }

    pub fn mark_retained(&mut self, id: &SymbolId, reason: impl Into<String>) {
        if let Some(symbol) = self.graph.node_mut(id) {
            symbol.mark_retained(reason);
        }
    }

    pub fn add_edge(
        &mut self,
        from: SymbolId,
        to: SymbolId,
        kind: EdgeKind,
        file: std::path::PathBuf,
        line: usize,
        column: usize,
    ) {
        self.graph.add_edge(from, to, kind, file, line, column);
    }

    pub fn log(&self, message: impl std::fmt::Display) {
        crate::error::debug(message);
    }
}

/// A single pass over the graph. `priority` breaks ties within a phase;
/// mutators must not depend on which earlier mutator in the same phase ran,
/// only on phases that are strictly earlier.
pub trait Mutator {
    fn phase(&self) -> Phase;
    fn priority(&self) -> i32 {
        0
    }
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut MutatorContext<'_>);
}

/// Run every mutator in phase order, then ascending priority within a phase.
pub fn run_pipeline(mutators: &[Box<dyn Mutator>], ctx: &mut MutatorContext<'_>) {
    let mut ordered: Vec<&Box<dyn Mutator>> = mutators.iter().collect();
    ordered.sort_by_key(|m| (phase_rank(m.phase()), m.priority()));
    for mutator in ordered {
        ctx.log(format!("running mutator {}", mutator.name()));
        mutator.run(ctx);
    }
}

fn phase_rank(phase: Phase) -> u8 {
    match phase {
        Phase::EntryPoints => 0,
        Phase::References => 1,
        Phase::Retention => 2,
        Phase::Marking => 3,
    }
}
