//! Centralized constants for the export pipeline.
//!
//! Toolchain locations, naming rules and the tokenizer allow-list live here so
//! the orchestration code never hard-codes them inline.

/// External toolchain defaults.
pub struct ToolchainConfig;

impl ToolchainConfig {
    /// Environment variable pointing at the TensorRT-LLM `examples/` directory.
    /// Read by the CLI argument parser.
    pub const ROOT_ENV: &'static str = "TRTLLM_ROOT";
    /// Environment variable overriding the detected TensorRT-LLM version.
    pub const VERSION_ENV: &'static str = "TRTLLM_VERSION";
    pub const DEFAULT_EXAMPLES_ROOT: &'static str = "../../TensorRT-LLM/examples";
    pub const DEFAULT_PYTHON: &'static str = "python";
    pub const DEFAULT_BUILD_EXECUTABLE: &'static str = "trtllm-build";
    /// Per-model-type script under `<examples_root>/<model_type>/`.
    pub const CONVERT_SCRIPT_NAME: &'static str = "convert_checkpoint.py";
    /// Snippet run with the Python interpreter to print the installed version.
    pub const VERSION_PROBE: &'static str = "import tensorrt_llm; print(tensorrt_llm.__version__)";
    pub const MAX_CONVERT_WORKERS: usize = 16;
}

/// Output and temp directory naming.
pub struct NamingConfig;

impl NamingConfig {
    /// Prefix of the version-tagged parent directory (`trtllm_<version>`).
    pub const VERSION_DIR_PREFIX: &'static str = "trtllm_";
    pub const TEMP_DIR_SUFFIX: &'static str = "-temp";
    /// A `temp_dir` equal to this literal is passed through unchanged.
    pub const TEMP_DIR_SENTINEL: &'static str = "None";
}

/// Tokenizer files copied next to the built engine.
pub struct TokenizerConfig;

impl TokenizerConfig {
    pub const FILES: [&'static str; 6] = [
        "special_tokens_map.json",
        "tokenization_internlm2.py",
        "tokenization_internlm2_fast.py",
        "tokenizer.json",
        "tokenizer.model",
        "tokenizer_config.json",
    ];
}
