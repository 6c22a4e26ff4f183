//! Shared error taxonomy and configuration for the multiverse workspace.

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, MultiverseError>;

/// Everything that can go wrong between a request and a generated character.
///
/// Each variant carries the structured context a caller needs to render an
/// actionable message without re-parsing the display string.
#[derive(thiserror::Error, Debug)]
pub enum MultiverseError {
    #[error("unknown universe '{universe}'; available: {available_list}", available_list = .available.join(", "))]
    UnknownUniverse {
        universe: String,
        available: Vec<String>,
    },

    #[error(
        "universe '{universe}' requires {expected} details, got {actual}; required fields: {field_list}",
        field_list = .fields.join(", ")
    )]
    DetailCountMismatch {
        universe: String,
        expected: usize,
        actual: usize,
        fields: Vec<String>,
    },

    #[error("detail for field '{field}' (position {index}) of universe '{universe}' is empty")]
    InvalidDetail {
        universe: String,
        field: String,
        index: usize,
    },

    #[error("{param} must be between {min} and {max}, got {value}")]
    ParamOutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("failed to initialize model '{model}': {source}")]
    ModelInit {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("text generation failed: {source}")]
    Generation {
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to {op} '{file_path}': {source}", file_path = .path.display())]
    FileOperation {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl MultiverseError {
    /// Stable machine-readable code for each error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownUniverse { .. } => "INVALID_UNIVERSE",
            Self::DetailCountMismatch { .. } => "INVALID_DETAILS",
            Self::InvalidDetail { .. } => "VALIDATION_ERROR",
            Self::ParamOutOfRange { .. } => "VALIDATION_ERROR",
            Self::ModelInit { .. } => "MODEL_INIT_ERROR",
            Self::Generation { .. } => "GENERATION_ERROR",
            Self::FileOperation { .. } => "FILE_OPERATION_ERROR",
        }
    }
}

pub mod config {
    use serde::Deserialize;
    use std::env;
    use std::path::PathBuf;

    /// Process-level defaults for the generator, overridable per CLI flag.
    #[derive(Debug, Clone, Deserialize)]
    pub struct GeneratorConfig {
        pub model: String,
        pub use_gpu: Option<bool>,
        pub cache_dir: Option<PathBuf>,
        pub output_dir: PathBuf,
    }

    impl Default for GeneratorConfig {
        fn default() -> Self {
            Self {
                model: "gpt2-medium".to_string(),
                use_gpu: None,
                cache_dir: None,
                output_dir: PathBuf::from("."),
            }
        }
    }

    impl GeneratorConfig {
        /// Load from the YAML file named by `MULTIVERSE_CONFIG`, else from
        /// individual `MULTIVERSE_*` variables, else defaults.
        pub fn load() -> Self {
            if let Ok(path) = env::var("MULTIVERSE_CONFIG") {
                let Ok(text) = std::fs::read_to_string(path) else {
                    return Self::default();
                };
                let Ok(cfg) = serde_yaml::from_str::<GeneratorConfig>(&text) else {
                    return Self::default();
                };
                return cfg;
            }
            let mut cfg = Self::default();
            if let Ok(model) = env::var("MULTIVERSE_MODEL") {
                cfg.model = model;
            }
            if let Ok(dir) = env::var("MULTIVERSE_CACHE_DIR") {
                cfg.cache_dir = Some(PathBuf::from(dir));
            }
            if let Ok(dir) = env::var("MULTIVERSE_OUTPUT_DIR") {
                cfg.output_dir = PathBuf::from(dir);
            }
            if let Some(v) = env::var("MULTIVERSE_USE_GPU").ok().and_then(|v| v.parse().ok()) {
                cfg.use_gpu = Some(v);
            }
            cfg
        }
    }
}
