//! Running external programs.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::Path;
use std::process::Command;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_command_impl(&self, program: &Path, args: &[String]) -> Result<()> {
        debug!("Running {:?} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to start {}", program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn run_interactive_impl(&self, program: &Path, args: &[String]) -> Result<i32> {
        debug!("Running {:?} {:?} with inherited stdio", program, args);

        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to start {}", program.display()))?;

        // No code means the program was killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}
