// src/process/runner.rs
//! Spawns the tool with merged output and a wall-clock ceiling.

use super::env::ToolEnv;
use crate::error::{Result, UpgradeError};
use crate::types::{display_command, ToolRun};
use std::ffi::OsString;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything needed to launch one invocation.
#[derive(Debug)]
pub struct Invocation<'a> {
    pub program: &'a Path,
    pub args: &'a [OsString],
    pub cwd: &'a Path,
    pub env: &'a ToolEnv,
    pub timeout: Duration,
}

impl Invocation<'_> {
    /// Program and arguments in display form.
    #[must_use]
    pub fn display(&self) -> String {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.as_os_str().to_os_string());
        argv.extend(self.args.iter().cloned());
        display_command(&argv)
    }
}

/// Runs the invocation with stdout and stderr both appended to `capture`.
///
/// On reaching the ceiling the child is killed and reaped and the returned
/// run is marked as timed out.
///
/// # Errors
/// Returns error if the capture handle cannot be duplicated, the process
/// cannot be spawned, or waiting on it fails.
pub fn run_captured(inv: &Invocation<'_>, capture: &File) -> Result<ToolRun> {
    let command_str = inv.display();
    let capture_err = |e| UpgradeError::io(e, inv.cwd);
    let stdout = capture.try_clone().map_err(capture_err)?;
    let stderr = capture.try_clone().map_err(capture_err)?;

    let mut command = Command::new(inv.program);
    command
        .args(inv.args)
        .current_dir(inv.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    inv.env.apply(&mut command);

    debug!(command = %command_str, cwd = %inv.cwd.display(), "spawning tool");
    let start = Instant::now();
    let mut child = command
        .spawn()
        .map_err(|e| UpgradeError::io(e, inv.program))?;

    let mut timed_out = false;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {
                if start.elapsed() >= inv.timeout {
                    timed_out = true;
                    warn!(command = %command_str, "tool exceeded {}s, killing", inv.timeout.as_secs());
                    let _ = child.kill();
                    match child.wait() {
                        Ok(status) => break Some(status),
                        Err(_) => break None,
                    }
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(UpgradeError::io(e, inv.program)),
        }
    };

    let exit_code = status.and_then(|s| s.code()).unwrap_or(-1);
    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;

    Ok(ToolRun::new(command_str, exit_code, timed_out, duration_ms))
}
