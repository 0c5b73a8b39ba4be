// src/strategy/mod.rs
//! The two ways of driving the tool.
//!
//! A strategy picks the inputs, builds the command line, interprets what
//! the tool left behind, and decides how each node comes back.

mod analyze;
mod upgrade;

pub use analyze::AnalyzeStrategy;
pub use upgrade::UpgradeStrategy;

use crate::error::Result;
use crate::pipeline::Accumulator;
use crate::reporting::AnalysisTable;
use crate::types::SourceNode;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub trait Strategy {
    /// The tool subcommand, for logs.
    fn name(&self) -> &'static str;

    /// Inputs to invoke the tool on, in discovery order.
    ///
    /// # Errors
    /// Returns error if there is nothing to invoke the tool on.
    fn inputs(&self, acc: &Accumulator) -> Result<Vec<PathBuf>>;

    /// Hook run right before each invocation.
    ///
    /// # Errors
    /// Returns error if preparation fails.
    fn before_invoke(&self, _acc: &Accumulator, _input: &Path) -> Result<()> {
        Ok(())
    }

    /// Arguments after the program name.
    fn build_command(&self, acc: &Accumulator, input: &Path) -> Vec<OsString>;

    /// Interprets a successful invocation of the tool named `tool`.
    /// `capture` holds merged output.
    ///
    /// # Errors
    /// Returns error if the output cannot be read.
    fn process_output(&self, acc: &mut Accumulator, tool: &str, input: &Path, capture: &Path) -> Result<()>;

    /// Produces the node that replaces `node` after the run.
    ///
    /// # Errors
    /// Returns error if the node cannot be reconciled and the run must stop.
    fn reconcile_node(
        &self,
        node: &SourceNode,
        acc: &Accumulator,
        table: &mut AnalysisTable,
    ) -> Result<SourceNode>;
}
