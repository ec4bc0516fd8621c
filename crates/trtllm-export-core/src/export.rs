//! Convert → build → copy tokenizer.
//!
//! The [`Exporter`] runs the three steps strictly in order against one
//! [`BuildConfig`], recording the resolved temp and output directories back
//! into it. The first failing step aborts the run; nothing is retried.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::build_config::BuildConfig;
use crate::command::{self, Invocation};
use crate::naming;
use crate::runner::{CommandRunner, SystemRunner};
use crate::tokenizer;
use crate::toolchain::ToolchainSettings;
use crate::{ExportError, Result};

/// A step of the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    Convert,
    Build,
    CopyTokenizer,
}

impl fmt::Display for ExportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportStep::Convert => "converting checkpoint",
            ExportStep::Build => "converting engine",
            ExportStep::CopyTokenizer => "copying tokenizer",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Checkpoint directory used between the two commands (already removed).
    pub temp_dir: PathBuf,
    /// Engine directory.
    pub output_dir: PathBuf,
    /// Tokenizer files copied into `output_dir`.
    pub tokenizer_files: Vec<PathBuf>,
}

/// Drives the toolchain for one config.
pub struct Exporter<R = SystemRunner> {
    toolchain: ToolchainSettings,
    runner: R,
    workers: usize,
}

impl Exporter<SystemRunner> {
    /// Exporter that spawns real processes.
    pub fn new(toolchain: ToolchainSettings) -> Self {
        Self::with_runner(toolchain, SystemRunner)
    }
}

impl<R: CommandRunner> Exporter<R> {
    pub fn with_runner(toolchain: ToolchainSettings, runner: R) -> Self {
        Self {
            toolchain,
            runner,
            workers: command::default_convert_workers(),
        }
    }

    /// Override the conversion worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run all three steps.
    pub async fn export(&self, config: &mut BuildConfig) -> Result<ExportReport> {
        let temp_dir = self.convert_checkpoint(config).await?;
        let output_dir = self.export_engine(config).await?;
        let tokenizer_files = self.copy_tokenizer(config, &output_dir);

        info!("Engine ready at {}", output_dir.display());
        Ok(ExportReport {
            temp_dir,
            output_dir,
            tokenizer_files,
        })
    }

    /// Convert the source checkpoint into the toolchain format.
    ///
    /// Stores the resolved checkpoint directory in `config.temp_dir`.
    pub async fn convert_checkpoint(&self, config: &mut BuildConfig) -> Result<PathBuf> {
        let temp_dir = naming::get_temp_dir(config.temp_dir.as_deref(), &config.model_dir);
        config.temp_dir = Some(temp_dir.clone());

        let invocation =
            command::convert_checkpoint_command(config, &self.toolchain, &temp_dir, self.workers);
        self.run_step(ExportStep::Convert, &invocation).await?;
        Ok(temp_dir)
    }

    /// Build the engine from the converted checkpoint, then delete the checkpoint.
    ///
    /// Stores the engine directory in `config.output_dir`.
    pub async fn export_engine(&self, config: &mut BuildConfig) -> Result<PathBuf> {
        let checkpoint_dir = naming::get_temp_dir(config.temp_dir.as_deref(), &config.model_dir);
        let output_dir = naming::get_output_dir(config, &self.toolchain.version)?;
        if let Some(requested) = config.output_dir.as_ref().filter(|d| **d != output_dir) {
            warn!(
                "Ignoring configured output_dir {}, engines are written to {}",
                requested.display(),
                output_dir.display()
            );
        }
        config.output_dir = Some(output_dir.clone());

        let invocation =
            command::build_engine_command(config, &self.toolchain, &checkpoint_dir, &output_dir);
        self.run_step(ExportStep::Build, &invocation).await?;

        remove_checkpoint(&checkpoint_dir)?;
        Ok(output_dir)
    }

    /// Copy tokenizer files from the model directory into `output_dir`.
    pub fn copy_tokenizer(&self, config: &BuildConfig, output_dir: &Path) -> Vec<PathBuf> {
        info!("Step: {}", ExportStep::CopyTokenizer);
        tokenizer::copy_tokenizer(&config.model_dir, output_dir)
    }

    async fn run_step(&self, step: ExportStep, invocation: &Invocation) -> Result<()> {
        info!("Step: {}\n  {}", step, invocation);
        let code = self.runner.run(invocation).await?;
        if code != 0 {
            return Err(ExportError::CommandFailed { step, code });
        }
        Ok(())
    }
}

fn remove_checkpoint(checkpoint_dir: &Path) -> Result<()> {
    info!("Removing converted checkpoint {}", checkpoint_dir.display());
    std::fs::remove_dir_all(checkpoint_dir)
        .map_err(|e| ExportError::io("removing converted checkpoint", checkpoint_dir, e))
}
