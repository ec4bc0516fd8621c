//! Integration tests for the export pipeline.
//!
//! A fake runner stands in for the toolchain: on success it creates the
//! directories the real tools would write, so the filesystem side effects of
//! the pipeline can be checked without TensorRT-LLM installed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use trtllm_export_core::{
    load_build_config, BuildConfig, CommandRunner, Dtype, ExportError, ExportStep, Exporter,
    Invocation, Result, ToolchainSettings,
};

/// Pretends to be `convert_checkpoint.py` and `trtllm-build`.
struct FakeToolchain {
    convert_code: i32,
    build_code: i32,
    /// Whether a successful conversion writes its output directory.
    write_checkpoint: bool,
    seen: Mutex<Vec<Invocation>>,
}

impl FakeToolchain {
    fn new(convert_code: i32, build_code: i32) -> Self {
        Self {
            convert_code,
            build_code,
            write_checkpoint: true,
            seen: Mutex::default(),
        }
    }

    fn programs(&self) -> Vec<PathBuf> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.program.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeToolchain {
    async fn run(&self, invocation: &Invocation) -> Result<i32> {
        self.seen.lock().unwrap().push(invocation.clone());
        let output_dir = PathBuf::from(invocation.flag_value("output_dir").unwrap());

        let is_build = invocation.flag_value("checkpoint_dir").is_some();
        let code = if is_build {
            self.build_code
        } else {
            self.convert_code
        };

        if code == 0 && (is_build || self.write_checkpoint) {
            std::fs::create_dir_all(&output_dir)?;
            let artifact = if is_build { "rank0.engine" } else { "rank0.safetensors" };
            std::fs::write(output_dir.join(artifact), b"")?;
        }
        Ok(code)
    }
}

/// Model directory with weights and a partial tokenizer.
fn create_model_dir(root: &Path) -> PathBuf {
    let model_dir = root.join("llama-7b");
    std::fs::create_dir_all(&model_dir).unwrap();
    std::fs::write(model_dir.join("config.json"), "{}").unwrap();
    std::fs::write(model_dir.join("model.safetensors"), "weights").unwrap();
    std::fs::write(model_dir.join("tokenizer.model"), "spm").unwrap();
    std::fs::write(model_dir.join("tokenizer_config.json"), "{}").unwrap();
    std::fs::write(model_dir.join("special_tokens_map.json"), "{}").unwrap();
    model_dir
}

fn toolchain() -> ToolchainSettings {
    ToolchainSettings::new("/opt/TensorRT-LLM/examples", "0.9.0")
}

#[tokio::test]
async fn test_full_export() {
    let root = TempDir::new().unwrap();
    let model_dir = create_model_dir(root.path());
    let config_path = root.path().join("build.yml");
    std::fs::write(
        &config_path,
        format!(
            "model_dir: {}\ntp_size: 2\ndtype: fp\n",
            model_dir.display()
        ),
    )
    .unwrap();

    let mut config = load_build_config(&config_path).unwrap();
    let exporter = Exporter::with_runner(toolchain(), FakeToolchain::new(0, 0));
    let report = exporter.export(&mut config).await.unwrap();

    let expected_output = root
        .path()
        .join("trtllm_0.9.0")
        .join("llama-7b-tp2-pp1-bw1-float16");
    assert_eq!(report.output_dir, expected_output);
    assert_eq!(config.output_dir, Some(expected_output.clone()));
    assert_eq!(report.temp_dir, root.path().join("llama-7b-temp"));
    assert_eq!(config.temp_dir, Some(report.temp_dir.clone()));

    // Temp checkpoint removed, engine and tokenizer files in place.
    assert!(!report.temp_dir.exists());
    assert!(expected_output.join("rank0.engine").exists());
    assert_eq!(report.tokenizer_files.len(), 3);
    assert!(expected_output.join("tokenizer.model").exists());
    assert!(!expected_output.join("tokenizer.json").exists());
    assert!(!expected_output.join("config.json").exists());

    let runner = exporter.runner();
    assert_eq!(
        runner.programs(),
        [PathBuf::from("python"), PathBuf::from("trtllm-build")]
    );
    let seen = runner.seen.lock().unwrap();
    assert_eq!(
        seen[1].flag_value("checkpoint_dir"),
        Some(report.temp_dir.as_os_str())
    );
}

#[tokio::test]
async fn test_convert_failure_skips_build() {
    let root = TempDir::new().unwrap();
    let model_dir = create_model_dir(root.path());
    let mut config = BuildConfig::new(&model_dir);

    let exporter = Exporter::with_runner(toolchain(), FakeToolchain::new(1, 0));
    let err = exporter.export(&mut config).await.unwrap_err();

    assert!(matches!(
        err,
        ExportError::CommandFailed {
            step: ExportStep::Convert,
            code: 1
        }
    ));
    assert_eq!(exporter.runner().programs(), [PathBuf::from("python")]);
    // The build step never ran, so no output path was derived or created.
    assert!(config.output_dir.is_none());
    assert!(!root.path().join("trtllm_0.9.0").exists());
}

#[tokio::test]
async fn test_build_failure_keeps_checkpoint() {
    let root = TempDir::new().unwrap();
    let model_dir = create_model_dir(root.path());
    let mut config = BuildConfig::new(&model_dir);
    config.dtype = Dtype::W4A16;

    let exporter = Exporter::with_runner(toolchain(), FakeToolchain::new(0, 2));
    let err = exporter.export(&mut config).await.unwrap_err();

    assert!(matches!(
        err,
        ExportError::CommandFailed {
            step: ExportStep::Build,
            code: 2
        }
    ));
    assert_eq!(err.exit_code(), 3);
    assert!(root.path().join("llama-7b-temp").exists());
    let output_dir = root
        .path()
        .join("trtllm_0.9.0")
        .join("llama-7b-tp1-pp1-bw1-w4a16");
    assert_eq!(config.output_dir, Some(output_dir.clone()));
    assert!(!output_dir.join("tokenizer.model").exists());
}

#[tokio::test]
async fn test_missing_checkpoint_dir_is_fatal() {
    let root = TempDir::new().unwrap();
    let model_dir = create_model_dir(root.path());
    let mut config = BuildConfig::new(&model_dir);

    let mut fake = FakeToolchain::new(0, 0);
    fake.write_checkpoint = false;
    let exporter = Exporter::with_runner(toolchain(), fake);
    let err = exporter.export(&mut config).await.unwrap_err();

    match err {
        ExportError::Io { path, .. } => {
            assert_eq!(path, Some(root.path().join("llama-7b-temp")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rerun_reuses_version_dir() {
    let root = TempDir::new().unwrap();
    let model_dir = create_model_dir(root.path());

    for dtype in [Dtype::Float16, Dtype::BFloat16] {
        let mut config = BuildConfig::new(&model_dir);
        config.dtype = dtype;
        let exporter = Exporter::with_runner(toolchain(), FakeToolchain::new(0, 0));
        exporter.export(&mut config).await.unwrap();
    }

    let mut names: Vec<String> = std::fs::read_dir(root.path().join("trtllm_0.9.0"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        ["llama-7b-tp1-pp1-bw1-bfloat16", "llama-7b-tp1-pp1-bw1-float16"]
    );
}
