use super::checklist::ChecklistDefinition;
use super::collector::{collect_responses, FormInput};
use super::domain::{AuditError, EvaluationDimension, Grade, ItemResponse};
use super::export::export_basename;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Unvalidated session metadata; grades may still be unset.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub special_notes: String,
    pub evaluations: BTreeMap<EvaluationDimension, Grade>,
}

impl ReviewDraft {
    pub fn new(reviewer_name: impl Into<String>, review_date: NaiveDate) -> Self {
        Self {
            reviewer_name: reviewer_name.into(),
            review_date,
            special_notes: String::new(),
            evaluations: BTreeMap::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.special_notes = notes.into();
        self
    }

    pub fn with_grade(mut self, dimension: EvaluationDimension, grade: Grade) -> Self {
        self.evaluations.insert(dimension, grade);
        self
    }

    pub fn with_uniform_grade(mut self, grade: Grade) -> Self {
        for dimension in EvaluationDimension::ordered() {
            self.evaluations.insert(dimension, grade);
        }
        self
    }
}

/// Complete set of the four summary grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluations {
    pub overall_readiness: Grade,
    pub sop_effectiveness: Grade,
    pub data_management_security: Grade,
    pub continuous_improvement: Grade,
}

impl Evaluations {
    pub fn uniform(grade: Grade) -> Self {
        Self {
            overall_readiness: grade,
            sop_effectiveness: grade,
            data_management_security: grade,
            continuous_improvement: grade,
        }
    }

    pub fn grade(&self, dimension: EvaluationDimension) -> Grade {
        match dimension {
            EvaluationDimension::OverallReadiness => self.overall_readiness,
            EvaluationDimension::SopEffectiveness => self.sop_effectiveness,
            EvaluationDimension::DataManagementSecurity => self.data_management_security,
            EvaluationDimension::ContinuousImprovement => self.continuous_improvement,
        }
    }

    /// Grades paired with their dimension, in fixed export order.
    pub fn entries(&self) -> [(EvaluationDimension, Grade); 4] {
        EvaluationDimension::ordered().map(|dimension| (dimension, self.grade(dimension)))
    }

    fn from_map(grades: &BTreeMap<EvaluationDimension, Grade>) -> Result<Self, AuditError> {
        let grade = |dimension: EvaluationDimension| grades.get(&dimension).copied();

        match (
            grade(EvaluationDimension::OverallReadiness),
            grade(EvaluationDimension::SopEffectiveness),
            grade(EvaluationDimension::DataManagementSecurity),
            grade(EvaluationDimension::ContinuousImprovement),
        ) {
            (Some(overall), Some(sop), Some(data), Some(improvement)) => Ok(Self {
                overall_readiness: overall,
                sop_effectiveness: sop,
                data_management_security: data,
                continuous_improvement: improvement,
            }),
            _ => Err(AuditError::IncompleteMetadata {
                missing: EvaluationDimension::ordered()
                    .into_iter()
                    .filter(|dimension| !grades.contains_key(dimension))
                    .collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewMetadata {
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub special_notes: String,
    pub evaluations: Evaluations,
}

/// Assembled snapshot of one audit session, ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    metadata: ReviewMetadata,
    responses: Vec<ItemResponse>,
}

impl AuditReport {
    pub fn assemble(
        responses: Vec<ItemResponse>,
        draft: ReviewDraft,
    ) -> Result<Self, AuditError> {
        let evaluations = Evaluations::from_map(&draft.evaluations)?;

        Ok(Self {
            metadata: ReviewMetadata {
                reviewer_name: draft.reviewer_name,
                review_date: draft.review_date,
                special_notes: draft.special_notes,
                evaluations,
            },
            responses,
        })
    }

    /// Collects the form answers and assembles them in one step.
    pub fn from_form(
        definition: &ChecklistDefinition,
        input: &FormInput,
        draft: ReviewDraft,
    ) -> Result<Self, AuditError> {
        let responses = collect_responses(definition, input)?;
        Self::assemble(responses, draft)
    }

    pub fn metadata(&self) -> &ReviewMetadata {
        &self.metadata
    }

    pub fn responses(&self) -> &[ItemResponse] {
        &self.responses
    }

    /// Shared file stem of every artifact exported from this report.
    pub fn export_basename(&self) -> String {
        export_basename(self.metadata.review_date, &self.metadata.reviewer_name)
    }
}
