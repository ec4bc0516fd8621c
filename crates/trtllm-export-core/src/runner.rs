//! External command execution.

use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;

use crate::command::Invocation;
use crate::{ExportError, Result};

/// Runs a toolchain command to completion and reports its exit code.
///
/// The orchestrator only ever looks at the exit code. Implementations must
/// not return before the process has terminated.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command, returning its exit code (`-1` if killed by a signal).
    async fn run(&self, invocation: &Invocation) -> Result<i32>;
}

/// Spawns real processes with stdio inherited from this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<i32> {
        let status = invocation
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| ExportError::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;

        let code = status.code().unwrap_or(-1);
        debug!("{} exited with {}", invocation.program.display(), code);
        Ok(code)
    }
}
