//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RUBRIC_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_EMBED_CACHE_CAPACITY, DEFAULT_EMBEDDING_DIM, DEFAULT_GRADE_MODEL_PATH,
    DEFAULT_MAX_COMPONENTS, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_MAX_SEQ_LEN,
    DEFAULT_MIN_CONTENT_LEN, DEFAULT_SEGMENTATION_MODEL, DEFAULT_SEGMENTATION_RETRIES,
};

/// Grading configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RUBRIC_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the embedding encoder (`config.json`, `model.safetensors`,
    /// `tokenizer.json`). `None` selects the deterministic stub embedder.
    pub model_dir: Option<PathBuf>,

    /// Embedding vector dimension. Default: `768`.
    pub embedding_dim: usize,

    /// Max tokens per embedded text. Default: `512`.
    pub max_seq_len: usize,

    /// Max characters of answer text sent to the segmentation service.
    /// Default: `6000`.
    pub max_prompt_chars: usize,

    /// Upper bound on structure components per answer. Default: `10`.
    pub max_components: usize,

    /// Answers shorter than this decompose via fallback without a service call.
    /// Default: `20`.
    pub min_content_len: usize,

    /// Chat model name for the segmentation service. Default: `gemma-3-27b-it`.
    pub segmentation_model: String,

    /// Segmentation retries after the first attempt. Default: `2`.
    pub segmentation_retries: usize,

    /// Force the deterministic fallback decomposition (never call the
    /// segmentation service). Default: `false`.
    pub use_structure_fallback: bool,

    /// Score components flagged by the segmentation service with an LLM rubric
    /// rating instead of cosine similarity. Default: `false`.
    pub llm_component_scoring: bool,

    /// Path to the grade classifier artifact. Default:
    /// `./models/grade_model.json`.
    pub grade_model_path: PathBuf,

    /// Max entries in the embedding memo cache. Default: `4096`.
    pub embed_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_components: DEFAULT_MAX_COMPONENTS,
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
            segmentation_model: DEFAULT_SEGMENTATION_MODEL.to_string(),
            segmentation_retries: DEFAULT_SEGMENTATION_RETRIES,
            use_structure_fallback: false,
            llm_component_scoring: false,
            grade_model_path: PathBuf::from(DEFAULT_GRADE_MODEL_PATH),
            embed_cache_capacity: DEFAULT_EMBED_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_MODEL_DIR: &'static str = "RUBRIC_MODEL_DIR";
    const ENV_EMBEDDING_DIM: &'static str = "RUBRIC_EMBEDDING_DIM";
    const ENV_MAX_SEQ_LEN: &'static str = "RUBRIC_MAX_SEQ_LEN";
    const ENV_MAX_PROMPT_CHARS: &'static str = "RUBRIC_MAX_PROMPT_CHARS";
    const ENV_MAX_COMPONENTS: &'static str = "RUBRIC_MAX_COMPONENTS";
    const ENV_MIN_CONTENT_LEN: &'static str = "RUBRIC_MIN_CONTENT_LEN";
    const ENV_SEGMENTATION_MODEL: &'static str = "RUBRIC_SEGMENTATION_MODEL";
    const ENV_SEGMENTATION_RETRIES: &'static str = "RUBRIC_SEGMENTATION_RETRIES";
    const ENV_USE_FALLBACK: &'static str = "RUBRIC_USE_FALLBACK";
    const ENV_LLM_COMPONENT_SCORING: &'static str = "RUBRIC_LLM_COMPONENT_SCORING";
    const ENV_GRADE_MODEL: &'static str = "RUBRIC_GRADE_MODEL";
    const ENV_EMBED_CACHE_CAPACITY: &'static str = "RUBRIC_EMBED_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            model_dir: Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR),
            embedding_dim: Self::parse_usize_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            ),
            max_seq_len: Self::parse_usize_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len),
            max_prompt_chars: Self::parse_usize_from_env(
                Self::ENV_MAX_PROMPT_CHARS,
                defaults.max_prompt_chars,
            ),
            max_components: Self::parse_usize_from_env(
                Self::ENV_MAX_COMPONENTS,
                defaults.max_components,
            ),
            min_content_len: Self::parse_usize_from_env(
                Self::ENV_MIN_CONTENT_LEN,
                defaults.min_content_len,
            ),
            segmentation_model: Self::parse_string_from_env(
                Self::ENV_SEGMENTATION_MODEL,
                defaults.segmentation_model,
            ),
            segmentation_retries: Self::parse_usize_from_env(
                Self::ENV_SEGMENTATION_RETRIES,
                defaults.segmentation_retries,
            ),
            use_structure_fallback: Self::parse_bool_from_env(
                Self::ENV_USE_FALLBACK,
                defaults.use_structure_fallback,
            ),
            llm_component_scoring: Self::parse_bool_from_env(
                Self::ENV_LLM_COMPONENT_SCORING,
                defaults.llm_component_scoring,
            ),
            grade_model_path: Self::parse_path_from_env(
                Self::ENV_GRADE_MODEL,
                defaults.grade_model_path,
            ),
            embed_cache_capacity: Self::parse_u64_from_env(
                Self::ENV_EMBED_CACHE_CAPACITY,
                defaults.embed_cache_capacity,
            ),
        })
    }

    /// Creates a test configuration: stub embedder, fallback decomposition.
    pub fn stub() -> Self {
        Self {
            use_structure_fallback: true,
            ..Default::default()
        }
    }

    /// Validates numeric invariants and configured paths (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "embedding dimension cannot be zero".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                reason: "max sequence length cannot be zero".to_string(),
            });
        }

        if self.max_components == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_COMPONENTS,
                reason: "component bound cannot be zero".to_string(),
            });
        }

        if let Some(ref dir) = self.model_dir {
            if !dir.exists() {
                return Err(ConfigError::PathNotFound { path: dir.clone() });
            }
            if !dir.is_dir() {
                return Err(ConfigError::NotADirectory { path: dir.clone() });
            }
        }

        if self.grade_model_path.exists() && !self.grade_model_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.grade_model_path.clone(),
            });
        }

        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::parse_optional_path_from_env(var_name).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => default,
        }
    }
}
