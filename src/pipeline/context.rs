//! Shared component handles for a grading run.

use tracing::warn;

use crate::config::Config;
use crate::embedding::{AnswerEmbedder, EmbedderConfig};
use crate::grading::GradeModel;
use crate::structure::{GenaiBackend, SegmentationBackend, StructureAnalyzer};

use super::error::PipelineError;

/// Loaded embedder, structure analyzer, and grade model.
///
/// Built once per run and shared by answer-key and submission processing.
#[derive(Debug)]
pub struct GradingContext<B> {
    embedder: AnswerEmbedder,
    analyzer: StructureAnalyzer<B>,
    grader: GradeModel,
    llm_component_scoring: bool,
}

impl GradingContext<GenaiBackend> {
    /// Loads all components per `config`, talking to the configured
    /// segmentation model.
    pub fn load(config: &Config) -> Result<Self, PipelineError> {
        let backend = GenaiBackend::new(config.segmentation_model.clone());
        Self::with_backend(config, backend)
    }
}

impl<B: SegmentationBackend> GradingContext<B> {
    /// Loads all components per `config` with a caller-supplied segmentation
    /// backend.
    ///
    /// A missing embedding model directory degrades to deterministic stub
    /// embeddings; a missing grade model artifact is fatal.
    pub fn with_backend(config: &Config, backend: B) -> Result<Self, PipelineError> {
        let embedder_config = match &config.model_dir {
            Some(dir) => EmbedderConfig {
                model_dir: dir.clone(),
                tokenizer_path: dir.join("tokenizer.json"),
                max_seq_len: config.max_seq_len,
                embedding_dim: config.embedding_dim,
                cache_capacity: config.embed_cache_capacity,
                testing_stub: false,
            },
            None => {
                warn!("No embedding model directory configured, using deterministic stub");
                EmbedderConfig {
                    max_seq_len: config.max_seq_len,
                    embedding_dim: config.embedding_dim,
                    cache_capacity: config.embed_cache_capacity,
                    ..EmbedderConfig::stub()
                }
            }
        };

        let embedder = AnswerEmbedder::load(embedder_config)?;
        let analyzer = StructureAnalyzer::from_config(backend, config);
        let grader = GradeModel::from_path(&config.grade_model_path)?;

        Ok(Self {
            embedder,
            analyzer,
            grader,
            llm_component_scoring: config.llm_component_scoring,
        })
    }

    pub fn embedder(&self) -> &AnswerEmbedder {
        &self.embedder
    }

    pub fn analyzer(&self) -> &StructureAnalyzer<B> {
        &self.analyzer
    }

    pub fn grader(&self) -> &GradeModel {
        &self.grader
    }

    /// `true` when flagged components are rated by the LLM instead of cosine.
    pub fn llm_component_scoring(&self) -> bool {
        self.llm_component_scoring
    }
}

#[cfg(any(test, feature = "mock"))]
impl GradingContext<crate::structure::MockSegmentation> {
    /// Fully in-memory context: stub embeddings, scripted segmentation, and a
    /// small built-in grade model. No files or network required.
    pub fn stub(config: &Config) -> Result<Self, PipelineError> {
        use crate::grading::{FEATURE_FULL, FEATURE_MEAN, FEATURE_TF_IDF, TrainingPoint};
        use crate::structure::MockSegmentation;

        let embedder_config = EmbedderConfig {
            embedding_dim: config.embedding_dim,
            ..EmbedderConfig::stub()
        };
        let embedder = AnswerEmbedder::load(embedder_config)?;
        let analyzer = StructureAnalyzer::from_config(MockSegmentation::new(), config);

        let feature_order = vec![
            FEATURE_TF_IDF.to_string(),
            FEATURE_FULL.to_string(),
            FEATURE_MEAN.to_string(),
        ];
        let points = vec![
            TrainingPoint {
                features: [0.0, 0.0, 0.0],
                label: "0".to_string(),
            },
            TrainingPoint {
                features: [0.35, 0.4, 0.4],
                label: "5".to_string(),
            },
            TrainingPoint {
                features: [0.75, 0.8, 0.8],
                label: "8".to_string(),
            },
            TrainingPoint {
                features: [0.95, 1.0, 1.0],
                label: "10".to_string(),
            },
        ];
        let grader = GradeModel::from_points(1, &feature_order, points)?;

        Ok(Self {
            embedder,
            analyzer,
            grader,
            llm_component_scoring: config.llm_component_scoring,
        })
    }
}
