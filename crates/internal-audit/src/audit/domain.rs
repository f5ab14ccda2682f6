use serde::{Deserialize, Serialize};
use std::fmt;

/// Reviewer judgment recorded against a single checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "未確認", alias = "unconfirmed")]
    Unconfirmed,
    #[serde(rename = "確認済", alias = "confirmed")]
    Confirmed,
    #[serde(rename = "要修正", alias = "needs_correction")]
    NeedsCorrection,
}

impl ItemStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Unconfirmed, Self::Confirmed, Self::NeedsCorrection]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unconfirmed => "未確認",
            Self::Confirmed => "確認済",
            Self::NeedsCorrection => "要修正",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "優", alias = "excellent")]
    Excellent,
    #[serde(rename = "良", alias = "good")]
    Good,
    #[serde(rename = "可", alias = "acceptable")]
    Acceptable,
    #[serde(rename = "不可", alias = "unacceptable")]
    Unacceptable,
}

impl Grade {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Excellent,
            Self::Good,
            Self::Acceptable,
            Self::Unacceptable,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "優",
            Self::Good => "良",
            Self::Acceptable => "可",
            Self::Unacceptable => "不可",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary dimensions graded by the advisor once the checklist is complete.
///
/// The declaration order is the export order for both the CSV columns and the
/// PDF summary table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EvaluationDimension {
    #[serde(rename = "総合的な体制整備", alias = "overall_readiness")]
    OverallReadiness,
    #[serde(rename = "SOP運用の実効性", alias = "sop_effectiveness")]
    SopEffectiveness,
    #[serde(rename = "データ管理とセキュリティ", alias = "data_management_security")]
    DataManagementSecurity,
    #[serde(rename = "継続的改善の姿勢", alias = "continuous_improvement")]
    ContinuousImprovement,
}

impl EvaluationDimension {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::OverallReadiness,
            Self::SopEffectiveness,
            Self::DataManagementSecurity,
            Self::ContinuousImprovement,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OverallReadiness => "総合的な体制整備",
            Self::SopEffectiveness => "SOP運用の実効性",
            Self::DataManagementSecurity => "データ管理とセキュリティ",
            Self::ContinuousImprovement => "継続的改善の姿勢",
        }
    }
}

impl fmt::Display for EvaluationDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChecklistItem {
    pub category: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResponse {
    pub category: &'static str,
    pub label: &'static str,
    pub status: ItemStatus,
    pub comment: String,
}

impl ItemResponse {
    pub fn item(&self) -> ChecklistItem {
        ChecklistItem {
            category: self.category,
            label: self.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("no status supplied for checklist item '{label}' ({category})")]
    MissingInput {
        category: &'static str,
        label: &'static str,
    },
    #[error("evaluation grades missing for: {}", join_labels(.missing))]
    IncompleteMetadata { missing: Vec<EvaluationDimension> },
}

fn join_labels(dimensions: &[EvaluationDimension]) -> String {
    dimensions
        .iter()
        .map(|dimension| dimension.label())
        .collect::<Vec<_>>()
        .join(", ")
}
