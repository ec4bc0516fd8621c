//! YAML build configuration.
//!
//! A run is described by a single flat YAML mapping whose keys are the
//! [`BuildConfig`] field names. Omitted keys take the documented defaults,
//! unknown keys are rejected, and numeric limits are validated before any
//! command is built.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dtype::Dtype;
use crate::{ExportError, Result};

fn default_model_type() -> String {
    "llama".to_string()
}

fn default_one() -> u32 {
    1
}

fn default_max_batch_size() -> u32 {
    32
}

fn default_max_input_len() -> u32 {
    1024
}

fn default_max_output_len() -> u32 {
    512
}

fn default_max_num_tokens() -> i64 {
    -1
}

fn default_true() -> bool {
    true
}

/// Settings for one checkpoint conversion + engine build.
///
/// `temp_dir` and `output_dir` are filled in by the orchestrator as the
/// convert and build steps run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Input model directory (Hugging Face layout).
    pub model_dir: PathBuf,
    /// Converted checkpoint location. Resolved by [`crate::naming::get_temp_dir`]:
    /// only the literal `None` survives, anything else becomes `<model_dir>-temp`.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Engine output directory, derived from the other fields when omitted.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Selects `<examples_root>/<model_type>/convert_checkpoint.py`.
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub remove_temp_dir: bool,
    #[serde(default = "default_one")]
    pub tp_size: u32,
    #[serde(default = "default_one")]
    pub pp_size: u32,
    #[serde(default = "default_one")]
    pub max_beam_width: u32,
    #[serde(default)]
    pub dtype: Dtype,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
    #[serde(default = "default_max_input_len")]
    pub max_input_len: u32,
    #[serde(default = "default_max_output_len")]
    pub max_output_len: u32,
    /// `-1` leaves the choice to the engine builder.
    #[serde(default = "default_max_num_tokens")]
    pub max_num_tokens: i64,
    #[serde(default = "default_true")]
    pub use_prompt_cache: bool,
}

impl BuildConfig {
    /// A config with every optional field at its default.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            temp_dir: None,
            output_dir: None,
            model_type: default_model_type(),
            remove_temp_dir: false,
            tp_size: 1,
            pp_size: 1,
            max_beam_width: 1,
            dtype: Dtype::default(),
            max_batch_size: default_max_batch_size(),
            max_input_len: default_max_input_len(),
            max_output_len: default_max_output_len(),
            max_num_tokens: default_max_num_tokens(),
            use_prompt_cache: true,
        }
    }

    /// Parse and validate a config from YAML text.
    ///
    /// `origin` is only used in error messages.
    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self> {
        let config: BuildConfig =
            serde_yaml::from_str(yaml).map_err(|source| ExportError::Yaml {
                path: origin.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.model_dir.as_os_str().is_empty() {
            return Err(ExportError::Validation {
                field: "model_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if self.model_type.trim().is_empty() {
            return Err(ExportError::Validation {
                field: "model_type".into(),
                message: "must not be empty".into(),
            });
        }

        let positive = [
            ("tp_size", self.tp_size),
            ("pp_size", self.pp_size),
            ("max_beam_width", self.max_beam_width),
            ("max_batch_size", self.max_batch_size),
            ("max_input_len", self.max_input_len),
            ("max_output_len", self.max_output_len),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ExportError::Validation {
                    field: field.into(),
                    message: "must be a positive integer".into(),
                });
            }
        }

        if self.max_num_tokens == 0 || self.max_num_tokens < -1 {
            return Err(ExportError::Validation {
                field: "max_num_tokens".into(),
                message: format!("must be positive or -1, got {}", self.max_num_tokens),
            });
        }
        Ok(())
    }

    /// Sequence length limit handed to the engine builder.
    pub fn max_seq_len(&self) -> u64 {
        u64::from(self.max_input_len) + u64::from(self.max_output_len)
    }
}

/// Read, parse and validate a YAML config file, logging the result.
pub fn load_build_config(path: impl AsRef<Path>) -> Result<BuildConfig> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path).map_err(|e| ExportError::Config {
        message: format!("cannot read {}: {e}", path.display()),
    })?;

    let config = BuildConfig::from_yaml_str(&yaml, path)?;

    info!(
        "Loaded build config from {}:\n{}",
        path.display(),
        serde_json::to_string_pretty(&config)?
    );
    Ok(config)
}
