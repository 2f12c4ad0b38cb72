use serde::{Deserialize, Serialize};

use super::ScoringError;

/// Contribution of each answer block to the weighted score, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    performance: u8,
    energy: u8,
    culture: u8,
}

impl ScoringWeights {
    pub fn new(performance: u8, energy: u8, culture: u8) -> Result<Self, ScoringError> {
        let total = u16::from(performance) + u16::from(energy) + u16::from(culture);
        if total != 100 {
            return Err(ScoringError::InvalidWeights { total });
        }

        Ok(Self {
            performance,
            energy,
            culture,
        })
    }

    pub const fn performance(&self) -> u8 {
        self.performance
    }

    pub const fn energy(&self) -> u8 {
        self.energy
    }

    pub const fn culture(&self) -> u8 {
        self.culture
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            performance: 40,
            energy: 30,
            culture: 30,
        }
    }
}
