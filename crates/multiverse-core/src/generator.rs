//! The generation facade: validate, build the prompt, call the backend,
//! optionally persist.

use crate::{params, persist, prompt, registry};
use multiverse_backend::{SamplingParams, TextGenBackend};
use multiverse_common::{MultiverseError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Per-request knobs beyond the universe and details.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub params: SamplingParams,
    pub save_to_file: bool,
    pub output_dir: Option<PathBuf>,
}

/// A finished generation. `path` is set only when persistence was requested
/// and succeeded.
#[derive(Debug, Clone)]
pub struct GeneratedCharacter {
    pub text: String,
    pub path: Option<PathBuf>,
}

/// Orchestrates character generation against a pluggable backend.
///
/// Cloning is cheap; clones share the backend. The registry is static, so a
/// single generator may serve concurrent requests without locking.
#[derive(Clone)]
pub struct CharacterGenerator {
    backend: Arc<dyn TextGenBackend>,
}

impl CharacterGenerator {
    pub fn new(backend: Arc<dyn TextGenBackend>) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Generate a character for `universe` from caller-supplied details.
    ///
    /// A save failure after successful generation fails the whole request;
    /// callers that want the text regardless should pass
    /// `save_to_file: false` and persist on their own.
    pub fn generate(
        &self,
        universe: &str,
        details: &[String],
        opts: &GenerateOptions,
    ) -> Result<GeneratedCharacter> {
        registry::get(universe)?;
        let prompt = prompt::build_prompt(universe, details)?;
        params::validate(&opts.params)?;
        tracing::debug!(universe, prompt_len = prompt.len(), "prompt built");

        let text = self
            .backend
            .generate(&prompt, &opts.params)
            .map_err(|source| MultiverseError::Generation { source })?;

        let path = if opts.save_to_file {
            Some(persist::save_character(
                &text,
                universe,
                details,
                opts.output_dir.as_deref(),
            )?)
        } else {
            None
        };

        tracing::info!(universe, saved = path.is_some(), "character generated");
        Ok(GeneratedCharacter { text, path })
    }

    /// Generate using the universe's built-in example values.
    pub fn quick_generate(&self, universe: &str, opts: &GenerateOptions) -> Result<GeneratedCharacter> {
        let def = registry::get(universe)?;
        let details: Vec<String> = def.examples.iter().map(|e| e.to_string()).collect();
        self.generate(universe, &details, opts)
    }

    /// Non-blocking variant of [`generate`]: the blocking work runs on the
    /// runtime's blocking pool. No cancellation point exists; dropping the
    /// future does not stop the underlying generation.
    ///
    /// [`generate`]: Self::generate
    pub async fn generate_async(
        &self,
        universe: &str,
        details: &[String],
        opts: &GenerateOptions,
    ) -> Result<GeneratedCharacter> {
        let this = self.clone();
        let universe = universe.to_string();
        let details = details.to_vec();
        let opts = opts.clone();
        tokio::task::spawn_blocking(move || this.generate(&universe, &details, &opts))
            .await
            .map_err(|e| MultiverseError::Generation {
                source: anyhow::anyhow!(e),
            })?
    }

    /// Non-blocking variant of [`quick_generate`].
    ///
    /// [`quick_generate`]: Self::quick_generate
    pub async fn quick_generate_async(
        &self,
        universe: &str,
        opts: &GenerateOptions,
    ) -> Result<GeneratedCharacter> {
        let this = self.clone();
        let universe = universe.to_string();
        let opts = opts.clone();
        tokio::task::spawn_blocking(move || this.quick_generate(&universe, &opts))
            .await
            .map_err(|e| MultiverseError::Generation {
                source: anyhow::anyhow!(e),
            })?
    }
}
