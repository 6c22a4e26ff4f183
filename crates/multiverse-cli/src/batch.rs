//! Batch request file parsing.
//!
//! Accepts either a bare JSON array of requests or an object with a
//! top-level `requests` array. Absent fields fall back to the CLI-level
//! defaults at dispatch time.

use multiverse_backend::SamplingParams;
use multiverse_core::GenerateOptions;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Wrapped { requests: Vec<BatchRequest> },
    Bare(Vec<BatchRequest>),
}

/// One request from a batch file. `details: None` means quick generation
/// with the universe's example values.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub universe: String,
    pub details: Option<Vec<String>>,
    pub max_length: Option<usize>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub repetition_penalty: Option<f64>,
    pub save_to_file: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

impl BatchRequest {
    /// Merge per-request overrides over the CLI-level defaults.
    pub fn options(&self, defaults: &GenerateOptions) -> GenerateOptions {
        GenerateOptions {
            params: SamplingParams {
                max_length: self.max_length.unwrap_or(defaults.params.max_length),
                temperature: self.temperature.unwrap_or(defaults.params.temperature),
                top_p: self.top_p.unwrap_or(defaults.params.top_p),
                repetition_penalty: self
                    .repetition_penalty
                    .unwrap_or(defaults.params.repetition_penalty),
            },
            save_to_file: self.save_to_file.unwrap_or(defaults.save_to_file),
            output_dir: self.output_dir.clone().or_else(|| defaults.output_dir.clone()),
        }
    }
}

pub fn parse(text: &str) -> serde_json::Result<Vec<BatchRequest>> {
    let file: BatchFile = serde_json::from_str(text)?;
    Ok(match file {
        BatchFile::Wrapped { requests } => requests,
        BatchFile::Bare(requests) => requests,
    })
}
