//! Grade prediction from similarity features.
//!
//! A trained k-nearest-neighbors model is loaded from a JSON artifact and
//! queried with the three similarity features computed per student answer.
//! The artifact pins its own feature order, so models trained with a
//! different column layout still predict correctly.

mod error;
#[cfg(test)]
mod tests;

pub use error::GradingError;

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

pub const FEATURE_TF_IDF: &str = "tf_idf_similarity";
pub const FEATURE_FULL: &str = "full_similarity_score";
pub const FEATURE_MEAN: &str = "mean_similarity_score";

/// Canonical feature order used by [`GradeModel::predict`] arguments.
const FEATURE_NAMES: [&str; 3] = [FEATURE_TF_IDF, FEATURE_FULL, FEATURE_MEAN];

/// One labeled training example in artifact feature order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPoint {
    pub features: [f32; 3],
    pub label: String,
}

#[derive(Deserialize)]
struct ModelArtifact {
    algorithm: String,
    k: usize,
    feature_order: Vec<String>,
    points: Vec<TrainingPoint>,
}

/// k-nearest-neighbors grade classifier over similarity features.
#[derive(Debug, Clone)]
pub struct GradeModel {
    k: usize,
    /// Maps artifact feature positions to canonical source indices.
    order: [usize; 3],
    points: Vec<TrainingPoint>,
}

impl GradeModel {
    /// Loads and validates a model artifact from disk.
    pub fn from_path(path: &Path) -> Result<Self, GradingError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GradingError::ArtifactNotFound {
                path: path.to_path_buf(),
            },
            _ => GradingError::ArtifactReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|e| GradingError::ArtifactMalformed {
                reason: e.to_string(),
            })?;

        if artifact.algorithm != "knn" {
            return Err(GradingError::UnsupportedAlgorithm {
                algorithm: artifact.algorithm,
            });
        }

        let model = Self::from_points(artifact.k, &artifact.feature_order, artifact.points)?;
        info!(
            path = %path.display(),
            k = model.k,
            points = model.points.len(),
            "Grade model loaded"
        );
        Ok(model)
    }

    /// Builds a model from in-memory points.
    pub fn from_points(
        k: usize,
        feature_order: &[String],
        points: Vec<TrainingPoint>,
    ) -> Result<Self, GradingError> {
        if k == 0 {
            return Err(GradingError::InvalidModel {
                reason: "k must be at least 1".to_string(),
            });
        }
        if points.is_empty() {
            return Err(GradingError::InvalidModel {
                reason: "model carries no training points".to_string(),
            });
        }
        let order = resolve_order(feature_order)?;

        Ok(Self { k, order, points })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Predicts a grade label from the three similarity features.
    ///
    /// Neighbors are ranked by squared Euclidean distance with index order
    /// breaking distance ties. Among the k nearest, the label that first
    /// reaches the winning vote count wins, so equal votes resolve toward
    /// the nearer neighbors.
    pub fn predict(&self, tfidf: f32, full: f32, mean: f32) -> String {
        let sources = [tfidf, full, mean];
        let query = [
            sources[self.order[0]],
            sources[self.order[1]],
            sources[self.order[2]],
        ];

        let mut ranked: Vec<(f32, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let distance = query
                    .iter()
                    .zip(point.features.iter())
                    .map(|(q, f)| (q - f) * (q - f))
                    .sum::<f32>();
                (distance, i)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let k = self.k.min(ranked.len());
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut winner = "";
        let mut winner_votes = 0;

        for (_, index) in &ranked[..k] {
            let label = self.points[*index].label.as_str();
            let votes = match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, c)) => {
                    *c += 1;
                    *c
                }
                None => {
                    counts.push((label, 1));
                    1
                }
            };
            if votes > winner_votes {
                winner = label;
                winner_votes = votes;
            }
        }

        winner.to_string()
    }
}

fn resolve_order(feature_order: &[String]) -> Result<[usize; 3], GradingError> {
    if feature_order.len() != FEATURE_NAMES.len() {
        return Err(GradingError::InvalidModel {
            reason: format!(
                "expected {} features, found {}",
                FEATURE_NAMES.len(),
                feature_order.len()
            ),
        });
    }

    let mut order = [0usize; 3];
    let mut seen = [false; 3];
    for (position, name) in feature_order.iter().enumerate() {
        let Some(source) = FEATURE_NAMES.iter().position(|n| n == name) else {
            return Err(GradingError::InvalidModel {
                reason: format!("unknown feature {name:?}"),
            });
        };
        if seen[source] {
            return Err(GradingError::InvalidModel {
                reason: format!("duplicate feature {name:?}"),
            });
        }
        seen[source] = true;
        order[position] = source;
    }

    Ok(order)
}
