use std::fmt;

use serde::{Deserialize, Serialize};

const VERY_HIGH_FIT_FLOOR: u8 = 80;
const APPROVED_FIT_FLOOR: u8 = 60;
const QUESTIONABLE_FIT_FLOOR: u8 = 40;

/// Band derived from the final score. Serialized as the exact label downstream filters match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Fit Altíssimo")]
    VeryHighFit,
    #[serde(rename = "Fit Aprovado")]
    ApprovedFit,
    #[serde(rename = "Fit Questionável")]
    QuestionableFit,
    #[serde(rename = "Fora do Perfil")]
    OutOfProfile,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::VeryHighFit,
        Classification::ApprovedFit,
        Classification::QuestionableFit,
        Classification::OutOfProfile,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Classification::VeryHighFit => "Fit Altíssimo",
            Classification::ApprovedFit => "Fit Aprovado",
            Classification::QuestionableFit => "Fit Questionável",
            Classification::OutOfProfile => "Fora do Perfil",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|classification| classification.label() == label)
    }

    /// Thresholds are inclusive lower bounds checked from the top band down.
    pub const fn from_score(final_score: u8) -> Self {
        if final_score >= VERY_HIGH_FIT_FLOOR {
            Classification::VeryHighFit
        } else if final_score >= APPROVED_FIT_FLOOR {
            Classification::ApprovedFit
        } else if final_score >= QUESTIONABLE_FIT_FLOOR {
            Classification::QuestionableFit
        } else {
            Classification::OutOfProfile
        }
    }

    /// Only approved bands are pushed to the webhook.
    pub const fn qualifies_for_notification(self) -> bool {
        matches!(
            self,
            Classification::VeryHighFit | Classification::ApprovedFit
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
