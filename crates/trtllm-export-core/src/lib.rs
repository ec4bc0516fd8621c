//! trtllm-export core - checkpoint conversion and engine builds for TensorRT-LLM.
//!
//! This crate turns a YAML [`BuildConfig`] into the two toolchain commands
//! that produce a TensorRT-LLM engine and runs them in order:
//!
//! 1. `convert_checkpoint.py` writes a toolchain checkpoint to a temp directory.
//! 2. `trtllm-build` compiles it into
//!    `<parent of model_dir>/trtllm_<version>/<model>-tp<N>-pp<N>-bw<N>-<dtype>`,
//!    after which the temp directory is deleted.
//! 3. Tokenizer files are copied next to the engine.
//!
//! No model data is touched in-process; all heavy lifting happens in the
//! external tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use trtllm_export_core::{load_build_config, Exporter, ToolchainSettings};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> trtllm_export_core::Result<()> {
//!     let mut config = load_build_config("build.yml")?;
//!     let toolchain = ToolchainSettings::new("/opt/TensorRT-LLM/examples", "0.9.0");
//!
//!     let report = Exporter::new(toolchain).export(&mut config).await?;
//!     println!("Engine written to {}", report.output_dir.display());
//!     Ok(())
//! }
//! ```

pub mod build_config;
pub mod command;
pub mod config;
pub mod dtype;
pub mod error;
pub mod export;
pub mod naming;
pub mod runner;
pub mod tokenizer;
pub mod toolchain;

pub use build_config::{load_build_config, BuildConfig};
pub use command::Invocation;
pub use dtype::{map_dtype, Dtype};
pub use error::{ExportError, Result};
pub use export::{ExportReport, ExportStep, Exporter};
pub use naming::{get_output_dir, get_temp_dir, output_dir_name};
pub use runner::{CommandRunner, SystemRunner};
pub use tokenizer::copy_tokenizer;
pub use toolchain::ToolchainSettings;
