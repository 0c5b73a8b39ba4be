// src/exit.rs
//! Standardized process exit codes for `upgrade-driver`.
//!
//! Provides a stable contract for scripts and automation.

use crate::error::UpgradeError;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DriverExit {
    /// Run completed.
    Success = 0,
    /// Generic error (IO, workspace, unexpected).
    Error = 1,
    /// Nothing to run on, or bad configuration.
    InvalidInput = 2,
    /// The tool executable could not be found.
    ToolMissing = 3,
    /// An invocation failed, timed out, or left an unusable report.
    InvocationFailed = 4,
    /// The tool reported a file it could not transform.
    FileFailed = 5,
}

impl DriverExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for DriverExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<&UpgradeError> for DriverExit {
    fn from(err: &UpgradeError) -> Self {
        match err {
            UpgradeError::NoProjectFiles
            | UpgradeError::InvalidPath { .. }
            | UpgradeError::Config(_) => Self::InvalidInput,
            UpgradeError::ToolNotFound { .. } => Self::ToolMissing,
            UpgradeError::Invocation { .. }
            | UpgradeError::TimedOut { .. }
            | UpgradeError::Report { .. } => Self::InvocationFailed,
            UpgradeError::FileFailed { .. } => Self::FileFailed,
            UpgradeError::WorkspaceInit { .. }
            | UpgradeError::Io { .. }
            | UpgradeError::Vanished { .. } => Self::Error,
        }
    }
}

/// Maps an error chain to an exit code, looking for the first
/// `UpgradeError` in it.
impl From<&anyhow::Error> for DriverExit {
    fn from(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<UpgradeError>())
            .map_or(Self::Error, Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn codes_are_stable() {
        assert_eq!(DriverExit::Success.code(), 0);
        assert_eq!(DriverExit::InvalidInput.code(), 2);
        assert_eq!(DriverExit::FileFailed.code(), 5);
    }

    #[test]
    fn maps_core_errors() {
        assert_eq!(DriverExit::from(&UpgradeError::NoProjectFiles), DriverExit::InvalidInput);
        assert_eq!(
            DriverExit::from(&UpgradeError::ToolNotFound { name: "ua".into() }),
            DriverExit::ToolMissing
        );
        assert_eq!(
            DriverExit::from(&UpgradeError::FileFailed {
                path: PathBuf::from("a.cs"),
                message: "x".into()
            }),
            DriverExit::FileFailed
        );
    }

    #[test]
    fn finds_core_error_through_context() {
        let result: anyhow::Result<()> = Err(UpgradeError::NoProjectFiles).context("upgrade failed");
        let err = result.unwrap_err();
        assert_eq!(DriverExit::from(&err), DriverExit::InvalidInput);
        assert_eq!(DriverExit::from(&anyhow::anyhow!("plain")), DriverExit::Error);

        let bad_config = anyhow::Error::new(UpgradeError::Config("max_passes".into())).context("In a.toml");
        assert_eq!(DriverExit::from(&bad_config), DriverExit::InvalidInput);
    }
}
