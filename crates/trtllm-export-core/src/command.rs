//! Argument lists for the two toolchain commands.
//!
//! Commands are kept as a program plus an argument vector and handed to the
//! OS as-is, so paths with spaces or shell metacharacters need no quoting.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::build_config::BuildConfig;
use crate::config::ToolchainConfig;
use crate::toolchain::ToolchainSettings;

/// A program and its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append `--name value`.
    pub fn flag(self, name: &str, value: impl AsRef<OsStr>) -> Self {
        self.arg(format!("--{name}")).arg(value)
    }

    /// Value following `--name`, if present.
    pub fn flag_value(&self, name: &str) -> Option<&OsStr> {
        let flag = format!("--{name}");
        self.args
            .iter()
            .position(|a| a.as_os_str() == OsStr::new(&flag))
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }

    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Shell-like rendering for logs. Arguments with whitespace are single-quoted.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Conversion worker count for a machine with `cpus` logical CPUs.
///
/// Half the CPUs, capped at 16, never below one.
pub fn convert_workers(cpus: usize) -> usize {
    (cpus / 2).clamp(1, ToolchainConfig::MAX_CONVERT_WORKERS)
}

/// Worker count for this machine.
pub fn default_convert_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    convert_workers(cpus)
}

/// `python <root>/<model_type>/convert_checkpoint.py --model_dir ... --workers N`.
pub fn convert_checkpoint_command(
    config: &BuildConfig,
    toolchain: &ToolchainSettings,
    temp_dir: &Path,
    workers: usize,
) -> Invocation {
    Invocation::new(&toolchain.python)
        .arg(toolchain.convert_script(&config.model_type))
        .flag("model_dir", &config.model_dir)
        .flag("tp_size", config.tp_size.to_string())
        .flag("pp_size", config.pp_size.to_string())
        .flag("dtype", config.dtype.toolchain_name())
        .flag("output_dir", temp_dir)
        .flag("workers", workers.to_string())
}

/// `trtllm-build --checkpoint_dir ... --use_paged_context_fmha enable`.
pub fn build_engine_command(
    config: &BuildConfig,
    toolchain: &ToolchainSettings,
    checkpoint_dir: &Path,
    output_dir: &Path,
) -> Invocation {
    Invocation::new(&toolchain.build_executable)
        .flag("checkpoint_dir", checkpoint_dir)
        .flag("output_dir", output_dir)
        .flag("gpt_attention_plugin", "auto")
        .flag("gemm_plugin", "auto")
        .flag("max_batch_size", config.max_batch_size.to_string())
        .flag("max_input_len", config.max_input_len.to_string())
        .flag("max_seq_len", config.max_seq_len().to_string())
        .flag("max_beam_width", config.max_beam_width.to_string())
        .flag("max_num_tokens", config.max_num_tokens.to_string())
        // KV cache reuse across requests sharing a prefix
        .flag("use_paged_context_fmha", "enable")
}
