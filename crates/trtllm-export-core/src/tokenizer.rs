//! Copies tokenizer files next to a built engine.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::TokenizerConfig;

/// Copy the allow-listed tokenizer files from `src_dir` into `dst_dir`.
///
/// Files missing from `src_dir` are skipped. A file that exists but cannot be
/// copied is logged and skipped too; this step never fails the export.
/// Returns the destination paths that were written.
pub fn copy_tokenizer(src_dir: &Path, dst_dir: &Path) -> Vec<PathBuf> {
    let mut copied = Vec::new();

    for file_name in TokenizerConfig::FILES {
        let src = src_dir.join(file_name);
        if !src.is_file() {
            debug!("No {} in {}, skipping", file_name, src_dir.display());
            continue;
        }

        let dst = dst_dir.join(file_name);
        match std::fs::copy(&src, &dst) {
            Ok(_) => copied.push(dst),
            Err(e) => warn!("Failed to copy {} to {}: {}", src.display(), dst.display(), e),
        }
    }

    info!(
        "Copied {} tokenizer file(s) to {}",
        copied.len(),
        dst_dir.display()
    );
    copied
}
