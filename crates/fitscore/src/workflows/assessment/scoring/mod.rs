mod policy;
mod rules;
mod weights;

pub use policy::Classification;
pub use weights::ScoringWeights;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentAnswers, Dimension};

/// Stateless evaluator turning the three answer blocks into a fit score.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, answers: &AssessmentAnswers) -> Result<ScoreResult, ScoringError> {
        let totals = rules::category_totals(answers)?;
        let final_score = rules::weighted_score(&totals, &self.weights);
        let [performance, energy, culture] = &totals;

        Ok(ScoreResult {
            final_score,
            classification: Classification::from_score(final_score),
            category_means: CategoryMeans {
                performance: performance.mean(),
                energy: energy.mean(),
                culture: culture.mean(),
            },
        })
    }
}

/// Per-block averages kept for audit display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeans {
    pub performance: f64,
    pub energy: f64,
    pub culture: f64,
}

/// Final score in 20..100 and the band it falls into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_score: u8,
    pub classification: Classification,
    pub category_means: CategoryMeans,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot score an unanswered dimension: {dimension}")]
    Unanswered { dimension: Dimension },
    #[error("category weights must add up to 100, got {total}")]
    InvalidWeights { total: u16 },
}
