//! Argument parsing, logging setup and exit codes for `trtllm-export`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trtllm_export_core::config::ToolchainConfig;
use trtllm_export_core::{
    load_build_config, toolchain, ExportError, ExportReport, Exporter, ToolchainSettings,
};

#[derive(Parser, Debug)]
#[command(name = "trtllm-export")]
#[command(about = "Convert a checkpoint and build a TensorRT-LLM engine from a YAML config")]
pub struct Args {
    /// YAML build config
    pub config: PathBuf,

    /// TensorRT-LLM examples directory holding the conversion scripts
    #[arg(long, env = ToolchainConfig::ROOT_ENV, default_value = ToolchainConfig::DEFAULT_EXAMPLES_ROOT)]
    pub trtllm_root: PathBuf,

    /// TensorRT-LLM version used to name the output directory (detected if omitted)
    #[arg(long, env = ToolchainConfig::VERSION_ENV)]
    pub trtllm_version: Option<String>,

    /// Python interpreter that runs the conversion script
    #[arg(long, default_value = ToolchainConfig::DEFAULT_PYTHON)]
    pub python: PathBuf,

    /// Engine build executable
    #[arg(long, default_value = ToolchainConfig::DEFAULT_BUILD_EXECUTABLE)]
    pub build_executable: PathBuf,

    /// Conversion worker count (defaults to half the CPUs, at most 16)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

pub fn init_logging(debug: bool) {
    // RUST_LOG wins over --debug when set.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .compact()
            .init();
        return;
    }

    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

/// Load the config, resolve the toolchain and run the export.
pub async fn run(args: Args) -> Result<ExportReport> {
    let mut config = load_build_config(&args.config)?;

    let version = toolchain::resolve_version(args.trtllm_version, &args.python).await?;
    let settings = ToolchainSettings::new(args.trtllm_root, version)
        .with_python(args.python)
        .with_build_executable(args.build_executable);
    info!(
        "TensorRT-LLM {} (examples at {})",
        settings.version,
        settings.examples_root.display()
    );

    let mut exporter = Exporter::new(settings);
    if let Some(workers) = args.workers {
        exporter = exporter.workers(workers);
    }

    let report = exporter
        .export(&mut config)
        .await
        .with_context(|| format!("export of {} failed", config.model_dir.display()))?;

    info!(
        "Done: {} ({} tokenizer file(s))",
        report.output_dir.display(),
        report.tokenizer_files.len()
    );
    Ok(report)
}

/// Process exit code for a failed run.
///
/// Looks through any added context for the underlying [`ExportError`];
/// anything else exits with 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ExportError>()
        .map(ExportError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trtllm_export_core::ExportStep;

    #[test]
    fn test_exit_code_sees_through_context() {
        let err = anyhow::Error::new(ExportError::CommandFailed {
            step: ExportStep::Convert,
            code: 1,
        })
        .context("export of /data/llama-7b failed");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_exit_code_categories() {
        let config = anyhow::Error::new(ExportError::UnknownDtype { code: "q4".into() });
        assert_eq!(exit_code(&config), 2);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let fs = anyhow::Error::new(ExportError::io("removing converted checkpoint", "/x", io))
            .context("export failed");
        assert_eq!(exit_code(&fs), 4);

        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }
}
