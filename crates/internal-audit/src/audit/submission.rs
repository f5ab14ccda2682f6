use super::checklist::ChecklistDefinition;
use super::collector::FormInput;
use super::domain::{AuditError, EvaluationDimension, Grade};
use super::report::{AuditReport, ReviewDraft};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire payload for one submitted audit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSubmission {
    #[serde(default)]
    pub reviewer_name: String,
    /// Defaults to the caller's current date when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub special_notes: String,
    #[serde(default)]
    pub answers: FormInput,
    #[serde(default)]
    pub evaluations: BTreeMap<EvaluationDimension, Grade>,
}

impl AuditSubmission {
    /// Pre-filled payload matching the form's initial state.
    pub fn template(definition: &ChecklistDefinition, today: NaiveDate) -> Self {
        Self {
            reviewer_name: String::new(),
            review_date: Some(today),
            special_notes: String::new(),
            answers: FormInput::defaults(definition),
            evaluations: BTreeMap::new(),
        }
    }

    pub fn into_report(
        self,
        definition: &ChecklistDefinition,
        today: NaiveDate,
    ) -> Result<AuditReport, AuditError> {
        let draft = ReviewDraft {
            reviewer_name: self.reviewer_name,
            review_date: self.review_date.unwrap_or(today),
            special_notes: self.special_notes,
            evaluations: self.evaluations,
        };

        AuditReport::from_form(definition, &self.answers, draft)
    }
}
