use serde::Serialize;

use super::domain::{AssessmentDraft, AssessmentStep, CandidateField, FieldKey};

const NAME_REQUIRED: &str = "Nome é obrigatório";
const EMAIL_REQUIRED: &str = "E-mail é obrigatório";
const RATING_REQUIRED: &str = "Este campo é obrigatório";

/// Whether every answer required by `step` has been provided.
///
/// The candidate step only requires non-empty name and e-mail; the e-mail format is not checked.
/// Rating steps require every dimension of their block to be answered.
pub fn is_step_valid(draft: &AssessmentDraft, step: AssessmentStep) -> bool {
    missing_fields(draft, step).is_empty()
}

/// Fields that still block forward navigation from `step`.
pub fn missing_fields(draft: &AssessmentDraft, step: AssessmentStep) -> Vec<FieldKey> {
    match step.category() {
        None => {
            let mut missing = Vec::new();
            if draft.candidate.name.is_empty() {
                missing.push(FieldKey::Candidate(CandidateField::Name));
            }
            if draft.candidate.email.is_empty() {
                missing.push(FieldKey::Candidate(CandidateField::Email));
            }
            missing
        }
        Some(category) => draft
            .answers
            .block(category)
            .unanswered()
            .into_iter()
            .map(FieldKey::Rating)
            .collect(),
    }
}

/// Inline message shown next to a field that is still missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldHint {
    pub field: FieldKey,
    pub message: &'static str,
}

/// Hints for the active step, limited to fields the evaluator already interacted with.
pub fn field_hints(draft: &AssessmentDraft) -> Vec<FieldHint> {
    missing_fields(draft, draft.active_step)
        .into_iter()
        .filter(|field| draft.touched.contains(*field))
        .map(|field| FieldHint {
            field,
            message: hint_message(field),
        })
        .collect()
}

fn hint_message(field: FieldKey) -> &'static str {
    match field {
        FieldKey::Candidate(CandidateField::Name) => NAME_REQUIRED,
        FieldKey::Candidate(CandidateField::Email) => EMAIL_REQUIRED,
        FieldKey::Rating(_) => RATING_REQUIRED,
    }
}
