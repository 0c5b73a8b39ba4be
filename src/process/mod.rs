// src/process/mod.rs
//! Locating, launching and judging the external tool.

pub mod driver;
pub mod env;
pub mod locate;
pub mod runner;

pub use driver::{DriveSummary, ProcessDriver, ToolSettings, FATAL_SENTINELS};
pub use env::ToolEnv;
pub use locate::{locate_tool, tool_file_name};
pub use runner::{run_captured, Invocation};
