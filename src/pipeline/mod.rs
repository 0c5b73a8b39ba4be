// src/pipeline/mod.rs
//! Multi-pass orchestration.
//!
//! Each pass runs three phases over every registered step:
//! 1. scan: give every step a fresh scratch root and write the tree into
//!    the root of the first registered step;
//! 2. execute: chain each later step from the previous step's root and run
//!    the tool (first pass only);
//! 3. revisit: reconcile every node through every step in order.
//!
//! Passes repeat until one leaves the tree unchanged or the pass limit is
//! reached.

pub mod accumulator;
pub mod context;

pub use accumulator::Accumulator;
pub use context::RunContext;

use crate::error::Result;
use crate::events::{EventKind, EventLogger};
use crate::process::ProcessDriver;
use crate::reporting::AnalysisTable;
use crate::stage::{chain_from, create_workspace, write_source};
use crate::strategy::Strategy;
use crate::types::{SourceNode, ToolRun};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_PASSES: u32 = 3;

/// Result of a whole run.
#[derive(Debug)]
pub struct RunOutcome {
    pub nodes: Vec<SourceNode>,
    pub table: AnalysisTable,
    /// Relative paths whose content was replaced from disk.
    pub changed: BTreeSet<PathBuf>,
    /// Relative paths that gained an annotation.
    pub annotated: BTreeSet<PathBuf>,
    pub passes: u32,
    pub runs: Vec<ToolRun>,
}

impl RunOutcome {
    fn unchanged(nodes: Vec<SourceNode>) -> Self {
        Self {
            nodes,
            table: AnalysisTable::new(),
            changed: BTreeSet::new(),
            annotated: BTreeSet::new(),
            passes: 0,
            runs: Vec::new(),
        }
    }

    /// The node at `path`, if present.
    #[must_use]
    pub fn node(&self, path: &Path) -> Option<&SourceNode> {
        self.nodes.iter().find(|n| n.path() == path)
    }
}

pub struct Pipeline {
    steps: Vec<Box<dyn Strategy>>,
    driver: ProcessDriver,
    context: RunContext,
    events: EventLogger,
    max_passes: u32,
}

impl Pipeline {
    /// All scratch state of the run lives under `work_root`.
    #[must_use]
    pub fn new(work_root: &Path, driver: ProcessDriver) -> Self {
        let events = EventLogger::new(work_root);
        Self {
            steps: Vec::new(),
            driver: driver.with_events(events.clone()),
            context: RunContext::new(work_root),
            events,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    #[must_use]
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Appends a step and returns its position.
    pub fn add_step(&mut self, strategy: Box<dyn Strategy>) -> usize {
        let position = self.steps.len();
        self.context.register_step(position);
        self.steps.push(strategy);
        position
    }

    #[must_use]
    pub fn events(&self) -> &EventLogger {
        &self.events
    }

    /// Runs every pass over `nodes`.
    ///
    /// # Errors
    /// Returns the first fatal error: workspace creation, missing inputs or
    /// tool, a file the upgrade reported as failed, or filesystem failure.
    pub fn run(&mut self, nodes: Vec<SourceNode>) -> Result<RunOutcome> {
        let mut outcome = RunOutcome::unchanged(nodes);
        if self.steps.is_empty() {
            return Ok(outcome);
        }

        for pass in 1..=self.max_passes {
            outcome.passes = pass;
            self.events.log(EventKind::PassStarted { pass });
            info!(pass, steps = self.steps.len(), "starting pass");

            let mut accs = self.scan(pass, &outcome.nodes)?;
            self.execute(pass, &mut accs, &mut outcome.runs)?;
            let changed = self.revisit(&accs, &mut outcome)?;

            self.events.log(EventKind::PassCompleted { pass, changed });
            if changed == 0 {
                debug!(pass, "tree unchanged, stopping");
                break;
            }
        }
        Ok(outcome)
    }

    fn scan(&self, pass: u32, nodes: &[SourceNode]) -> Result<Vec<(PathBuf, Accumulator)>> {
        let mut accs = Vec::with_capacity(self.steps.len());
        for position in 0..self.steps.len() {
            let step_dir = self.context.step_dir(pass, position);
            let mut acc = Accumulator::new(create_workspace(&step_dir)?);
            self.events.log(EventKind::WorkspaceCreated {
                path: acc.directory().display().to_string(),
            });

            if self.context.is_first_step(position) {
                for node in nodes {
                    write_source(&mut acc, node)?;
                }
                self.events.log(EventKind::SourcesMaterialized { count: nodes.len() });
            }
            accs.push((step_dir, acc));
        }
        Ok(accs)
    }

    fn execute(
        &mut self,
        pass: u32,
        accs: &mut [(PathBuf, Accumulator)],
        runs: &mut Vec<ToolRun>,
    ) -> Result<()> {
        for (position, (step_dir, acc)) in accs.iter_mut().enumerate() {
            if !self.context.is_first_step(position) {
                if let Some(previous) = self.context.previous_dir().map(Path::to_path_buf) {
                    let stats = chain_from(&previous, acc)?;
                    debug!(from = %previous.display(), "{}", stats.summary());
                    self.events.log(EventKind::WorkspaceChained {
                        from: previous.display().to_string(),
                        files_copied: stats.files_copied,
                    });
                }
            }

            // The tool is not idempotent: a second run over upgraded
            // projects reports an unknown target framework.
            if pass == 1 {
                let strategy = self.steps[position].as_ref();
                let summary = self.driver.drive(strategy, acc, step_dir)?;
                if !summary.failed_inputs.is_empty() {
                    warn!(
                        step = strategy.name(),
                        failed = summary.failed_inputs.len(),
                        "some inputs failed; their errors surface during revisit"
                    );
                }
                debug!(step = strategy.name(), changed = summary.changed, "step executed");
                runs.extend(summary.runs);
            }
            self.context.set_previous_dir(acc.directory());
        }
        Ok(())
    }

    fn revisit(&self, accs: &[(PathBuf, Accumulator)], outcome: &mut RunOutcome) -> Result<usize> {
        let mut changed = 0;
        for (strategy, (_, acc)) in self.steps.iter().zip(accs) {
            let mut next = Vec::with_capacity(outcome.nodes.len());
            for node in &outcome.nodes {
                let after = strategy.reconcile_node(node, acc, &mut outcome.table)?;
                if after.annotations().len() > node.annotations().len() {
                    let message = after
                        .annotations()
                        .last()
                        .map(|a| a.message.clone())
                        .unwrap_or_default();
                    self.events.log(EventKind::NodeAnnotated {
                        path: node.path().display().to_string(),
                        message,
                    });
                    outcome.annotated.insert(node.path().to_path_buf());
                    changed += 1;
                } else if after.content() != node.content() {
                    self.events.log(EventKind::NodeReplaced {
                        path: node.path().display().to_string(),
                    });
                    outcome.changed.insert(node.path().to_path_buf());
                    changed += 1;
                }
                next.push(after);
            }
            outcome.nodes = next;
        }
        Ok(changed)
    }
}
