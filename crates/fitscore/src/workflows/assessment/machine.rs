use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentDraft, AssessmentStep, CandidateField, CultureDimension, Dimension,
    EnergyDimension, PerformanceDimension, Rating, RatingError, RatingInput,
};
use super::validation::is_step_valid;

/// One field edit, tagged by the block it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldUpdate {
    Name {
        value: String,
    },
    Email {
        value: String,
    },
    Performance {
        dimension: PerformanceDimension,
        value: RatingInput,
    },
    Energy {
        dimension: EnergyDimension,
        value: RatingInput,
    },
    Culture {
        dimension: CultureDimension,
        value: RatingInput,
    },
}

/// Reasons a navigation or edit request is refused. The draft is never touched when one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("step '{}' is incomplete", .0.title())]
    StepIncomplete(AssessmentStep),
    #[error("already on the first step")]
    AtFirstStep,
    #[error("already on the last step")]
    AtLastStep,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    InvalidRating(#[from] RatingError),
}

/// Owns the draft and the single in-flight submission flag.
#[derive(Debug, Clone, Default)]
pub struct FormStateMachine {
    draft: AssessmentDraft,
    submitting: bool,
}

impl FormStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    pub fn active_step(&self) -> AssessmentStep {
        self.draft.active_step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_active_step_valid(&self) -> bool {
        is_step_valid(&self.draft, self.draft.active_step)
    }

    pub fn can_advance(&self) -> bool {
        !self.submitting
            && self.draft.active_step != AssessmentStep::LAST
            && self.is_active_step_valid()
    }

    pub fn can_retreat(&self) -> bool {
        !self.submitting && self.draft.active_step != AssessmentStep::FIRST
    }

    /// Edits are accepted on any step, so every step is rechecked before finalizing.
    pub fn first_incomplete_step(&self) -> Option<AssessmentStep> {
        AssessmentStep::ALL
            .into_iter()
            .find(|step| !is_step_valid(&self.draft, *step))
    }

    pub fn can_finalize(&self) -> bool {
        !self.submitting
            && self.draft.active_step == AssessmentStep::LAST
            && self.first_incomplete_step().is_none()
    }

    pub fn advance(&mut self) -> Result<AssessmentStep, FormError> {
        self.ensure_idle()?;
        let current = self.draft.active_step;
        let next = current.next().ok_or(FormError::AtLastStep)?;
        if !is_step_valid(&self.draft, current) {
            return Err(FormError::StepIncomplete(current));
        }

        self.draft.active_step = next;
        Ok(next)
    }

    /// Confirm-key shortcut; gated exactly like [`FormStateMachine::advance`].
    pub fn advance_on_confirm(&mut self) -> Result<AssessmentStep, FormError> {
        self.advance()
    }

    pub fn retreat(&mut self) -> Result<AssessmentStep, FormError> {
        self.ensure_idle()?;
        let previous = self
            .draft
            .active_step
            .previous()
            .ok_or(FormError::AtFirstStep)?;

        self.draft.active_step = previous;
        Ok(previous)
    }

    pub fn set_candidate_field(
        &mut self,
        field: CandidateField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_idle()?;
        let slot = match field {
            CandidateField::Name => &mut self.draft.candidate.name,
            CandidateField::Email => &mut self.draft.candidate.email,
        };
        *slot = value.into();
        self.draft.touched.mark(field);
        Ok(())
    }

    pub fn set_rating(
        &mut self,
        dimension: Dimension,
        input: impl Into<RatingInput>,
    ) -> Result<Rating, FormError> {
        self.ensure_idle()?;
        let rating = Rating::coerce(&input.into())?;
        self.draft.touched.mark(dimension);
        self.draft.answers.set(dimension, rating);
        Ok(rating)
    }

    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), FormError> {
        match update {
            FieldUpdate::Name { value } => self.set_candidate_field(CandidateField::Name, value),
            FieldUpdate::Email { value } => self.set_candidate_field(CandidateField::Email, value),
            FieldUpdate::Performance { dimension, value } => self
                .set_rating(Dimension::Performance(dimension), value)
                .map(|_| ()),
            FieldUpdate::Energy { dimension, value } => self
                .set_rating(Dimension::Energy(dimension), value)
                .map(|_| ()),
            FieldUpdate::Culture { dimension, value } => self
                .set_rating(Dimension::Culture(dimension), value)
                .map(|_| ()),
        }
    }

    /// Claim the submission slot and hand back the draft to score and store.
    pub(crate) fn begin_submission(&mut self) -> Result<AssessmentDraft, FormError> {
        self.ensure_idle()?;
        if self.draft.active_step != AssessmentStep::LAST {
            return Err(FormError::StepIncomplete(self.draft.active_step));
        }
        if let Some(step) = self.first_incomplete_step() {
            return Err(FormError::StepIncomplete(step));
        }

        self.submitting = true;
        Ok(self.draft.clone())
    }

    pub(crate) fn end_submission(&mut self) {
        self.submitting = false;
    }

    /// Back to the initial defaults, including the first step and an idle submission slot.
    pub fn reset(&mut self) {
        self.draft = AssessmentDraft::default();
        self.submitting = false;
    }

    fn ensure_idle(&self) -> Result<(), FormError> {
        if self.submitting {
            Err(FormError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }
}
