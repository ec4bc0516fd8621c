//! Location and version of the external TensorRT-LLM toolchain.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ToolchainConfig;
use crate::{ExportError, Result};

/// Everything the orchestrator needs to know about the installed toolchain.
///
/// The version tags the output directory, so it is resolved once up front and
/// passed around instead of being looked up mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSettings {
    /// TensorRT-LLM `examples/` directory holding the per-model conversion scripts.
    pub examples_root: PathBuf,
    /// Interpreter used to run the conversion script.
    pub python: PathBuf,
    /// Engine build executable.
    pub build_executable: PathBuf,
    /// Toolchain version, e.g. `0.9.0`.
    pub version: String,
}

impl ToolchainSettings {
    /// Settings with default executables and the given root and version.
    pub fn new(examples_root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            examples_root: examples_root.into(),
            python: PathBuf::from(ToolchainConfig::DEFAULT_PYTHON),
            build_executable: PathBuf::from(ToolchainConfig::DEFAULT_BUILD_EXECUTABLE),
            version: version.into(),
        }
    }

    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_build_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.build_executable = executable.into();
        self
    }

    /// Path of the conversion script for a model type.
    pub fn convert_script(&self, model_type: &str) -> PathBuf {
        self.examples_root
            .join(model_type)
            .join(ToolchainConfig::CONVERT_SCRIPT_NAME)
    }
}

/// Ask the installed `tensorrt_llm` Python package for its version.
pub async fn detect_version(python: &Path) -> Result<String> {
    debug!("Probing TensorRT-LLM version with {}", python.display());
    let output = Command::new(python)
        .args(["-c", ToolchainConfig::VERSION_PROBE])
        .output()
        .await
        .map_err(|source| ExportError::Spawn {
            program: python.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::ToolchainVersion {
            message: format!("version probe failed: {}", stderr.trim()),
        });
    }

    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// Take the last non-empty line of the probe output.
///
/// Importing `tensorrt_llm` prints its own banner before the version.
pub fn parse_version_output(stdout: &str) -> Result<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
        .ok_or_else(|| ExportError::ToolchainVersion {
            message: "version probe printed nothing".into(),
        })
}

/// Use the given version, or probe the interpreter when there is none.
///
/// Blank values count as absent.
pub async fn resolve_version(explicit: Option<String>, python: &Path) -> Result<String> {
    if let Some(version) = explicit
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        return Ok(version);
    }
    let version = detect_version(python).await?;
    info!("Detected TensorRT-LLM {}", version);
    Ok(version)
}
