//! Temp and output directory naming.
//!
//! Output names encode everything that makes two engines incompatible:
//! `<model>-tp<N>-pp<N>-bw<N>-<dtype>`, nested under a `trtllm_<version>`
//! directory next to the source model.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::build_config::BuildConfig;
use crate::config::NamingConfig;
use crate::{ExportError, Result};

/// Directory the converted checkpoint is written to.
///
/// A `temp_dir` that is literally `"None"` is returned unchanged; anything
/// else, including no value, yields `<model_dir>-temp`, a sibling of the
/// model directory even when `model_dir` ends in a separator.
pub fn get_temp_dir(temp_dir: Option<&Path>, model_dir: &Path) -> PathBuf {
    match temp_dir {
        Some(dir) if dir.as_os_str() == NamingConfig::TEMP_DIR_SENTINEL => dir.to_path_buf(),
        _ => {
            let mut name = model_dir
                .components()
                .collect::<PathBuf>()
                .into_os_string();
            name.push(NamingConfig::TEMP_DIR_SUFFIX);
            PathBuf::from(name)
        }
    }
}

/// Descriptive engine folder name, e.g. `llama-7b-tp2-pp1-bw1-float16`.
pub fn output_dir_name(config: &BuildConfig) -> String {
    let model_name = config
        .model_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "{}-tp{}-pp{}-bw{}-{}",
        model_name,
        config.tp_size,
        config.pp_size,
        config.max_beam_width,
        config.dtype.toolchain_name()
    )
}

/// `<parent(model_dir)>/trtllm_<version>`.
pub fn version_dir(model_dir: &Path, version: &str) -> PathBuf {
    model_dir
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{}{}", NamingConfig::VERSION_DIR_PREFIX, version))
}

/// Final engine directory path, without touching the filesystem.
pub fn output_dir_path(config: &BuildConfig, version: &str) -> PathBuf {
    version_dir(&config.model_dir, version).join(output_dir_name(config))
}

/// Final engine directory path. Creates the version-tagged parent if absent.
pub fn get_output_dir(config: &BuildConfig, version: &str) -> Result<PathBuf> {
    let parent = version_dir(&config.model_dir, version);
    match std::fs::create_dir(&parent) {
        Ok(()) => debug!("Created version directory {}", parent.display()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(ExportError::io("creating version directory", &parent, e)),
    }
    Ok(parent.join(output_dir_name(config)))
}
