pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod exit;
pub mod parse;
pub mod pipeline;
pub mod process;
pub mod reconcile;
pub mod reporting;
pub mod stage;
pub mod strategy;
pub mod tree;
pub mod types;

pub use error::{Result, UpgradeError};
pub use pipeline::{Pipeline, RunOutcome};
pub use types::SourceNode;
