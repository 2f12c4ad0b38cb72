use super::super::domain::{AnswerBlock, AssessmentAnswers, Category};
use super::weights::ScoringWeights;
use super::ScoringError;

/// Maps the weighted mean on the 1..5 scale onto 20..100.
const SCALE: u64 = 20;

pub(crate) struct BlockTotal {
    pub sum: u64,
    pub count: u64,
}

impl BlockTotal {
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }
}

pub(crate) fn block_total(block: &dyn AnswerBlock) -> Result<BlockTotal, ScoringError> {
    let ratings = block.ratings();
    if let Some((dimension, _)) = ratings.iter().find(|(_, rating)| !rating.is_answered()) {
        return Err(ScoringError::Unanswered {
            dimension: *dimension,
        });
    }

    Ok(BlockTotal {
        sum: ratings
            .iter()
            .map(|(_, rating)| u64::from(rating.value()))
            .sum(),
        count: ratings.len() as u64,
    })
}

pub(crate) fn category_totals(
    answers: &AssessmentAnswers,
) -> Result<[BlockTotal; 3], ScoringError> {
    Ok([
        block_total(answers.block(Category::Performance))?,
        block_total(answers.block(Category::Energy))?,
        block_total(answers.block(Category::Culture))?,
    ])
}

/// `round(sum(weight * mean) * 20)` evaluated on integers, rounding half up.
///
/// Every term is brought over the common denominator `100 * product(counts)` so the
/// result never depends on float representation.
pub(crate) fn weighted_score(totals: &[BlockTotal; 3], weights: &ScoringWeights) -> u8 {
    let weights = [
        u64::from(weights.performance()),
        u64::from(weights.energy()),
        u64::from(weights.culture()),
    ];
    let common: u64 = totals.iter().map(|total| total.count).product();

    let numerator: u64 = totals
        .iter()
        .zip(weights)
        .map(|(total, weight)| weight * total.sum * SCALE * (common / total.count))
        .sum();
    let denominator = 100 * common;

    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u8::try_from(rounded).unwrap_or(u8::MAX)
}
