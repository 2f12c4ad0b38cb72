use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repository::{CandidateId, StoredCandidate};
use super::scoring::Classification;

/// Sentinel accepted in place of a label to disable the classification filter.
const ALL_CLASSIFICATIONS: &str = "all";

/// Query over previously stored candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RosterFilter {
    #[serde(default)]
    pub search: Option<String>,
    /// Matched byte-for-byte against the stored label.
    #[serde(default)]
    pub classification: Option<String>,
}

impl RosterFilter {
    pub fn matches(&self, candidate: &StoredCandidate) -> bool {
        self.matches_search(candidate) && self.matches_classification(candidate)
    }

    fn matches_search(&self, candidate: &StoredCandidate) -> bool {
        let Some(term) = self.search.as_deref().filter(|term| !term.is_empty()) else {
            return true;
        };

        let term = term.to_lowercase();
        candidate.record.name.to_lowercase().contains(&term)
            || candidate.record.email.to_lowercase().contains(&term)
    }

    fn matches_classification(&self, candidate: &StoredCandidate) -> bool {
        match self.classification.as_deref() {
            None | Some("") | Some(ALL_CLASSIFICATIONS) => true,
            Some(label) => candidate.record.classification.label() == label,
        }
    }
}

/// Row shown in the candidate listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub fit_score: u8,
    pub classification: Classification,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredCandidate> for RosterEntry {
    fn from(candidate: &StoredCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.record.name.clone(),
            email: candidate.record.email.clone(),
            fit_score: candidate.record.fit_score,
            classification: candidate.record.classification,
            created_at: candidate.created_at,
        }
    }
}

/// Band counts over every stored candidate, bucketed by score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    pub very_high: usize,
    pub approved: usize,
    pub questionable: usize,
    pub out_of_profile: usize,
    pub average_score: u8,
}

impl RosterStats {
    pub fn from_candidates(candidates: &[StoredCandidate]) -> Self {
        let mut stats = RosterStats {
            total: candidates.len(),
            ..RosterStats::default()
        };

        let mut score_sum: u64 = 0;
        for candidate in candidates {
            score_sum += u64::from(candidate.record.fit_score);
            match Classification::from_score(candidate.record.fit_score) {
                Classification::VeryHighFit => stats.very_high += 1,
                Classification::ApprovedFit => stats.approved += 1,
                Classification::QuestionableFit => stats.questionable += 1,
                Classification::OutOfProfile => stats.out_of_profile += 1,
            }
        }

        if stats.total > 0 {
            let total = stats.total as u64;
            let average = (2 * score_sum + total) / (2 * total);
            stats.average_score = u8::try_from(average).unwrap_or(u8::MAX);
        }

        stats
    }
}

/// Listing payload: stats cover the full roster, entries honor the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterView {
    pub stats: RosterStats,
    pub candidates: Vec<RosterEntry>,
}

impl RosterView {
    pub fn build(candidates: &[StoredCandidate], filter: &RosterFilter) -> Self {
        Self {
            stats: RosterStats::from_candidates(candidates),
            candidates: candidates
                .iter()
                .filter(|candidate| filter.matches(candidate))
                .map(RosterEntry::from)
                .collect(),
        }
    }
}
