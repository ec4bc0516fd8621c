//! trtllm-export - build a TensorRT-LLM engine from a YAML config.
//!
//! Converts the checkpoint, builds the engine, and copies tokenizer files,
//! one step after the other. Toolchain output goes straight to the terminal.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use trtllm_export_cli::{exit_code, init_logging, run, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
