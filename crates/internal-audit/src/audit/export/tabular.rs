use super::ExportError;
use crate::audit::domain::EvaluationDimension;
use crate::audit::report::AuditReport;
use serde::Serialize;

/// Column headers in output order.
pub const HEADERS: [&str; 9] = [
    "カテゴリ",
    "項目",
    "対応状況",
    "コメント",
    "特記事項",
    EvaluationDimension::OverallReadiness.label(),
    EvaluationDimension::SopEffectiveness.label(),
    EvaluationDimension::DataManagementSecurity.label(),
    EvaluationDimension::ContinuousImprovement.label(),
];

// Notes and grades repeat on every row so the export stays one flat table.
#[derive(Debug, Serialize)]
struct TabularRow<'a> {
    category: &'a str,
    label: &'a str,
    status: &'static str,
    comment: &'a str,
    special_notes: &'a str,
    overall_readiness: &'static str,
    sop_effectiveness: &'static str,
    data_management_security: &'static str,
    continuous_improvement: &'static str,
}

/// Renders the report as UTF-8 CSV: a header row, then one row per item.
pub fn render(report: &AuditReport) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;

    let metadata = report.metadata();
    let grades = metadata.evaluations;
    for response in report.responses() {
        writer.serialize(TabularRow {
            category: response.category,
            label: response.label,
            status: response.status.label(),
            comment: &response.comment,
            special_notes: &metadata.special_notes,
            overall_readiness: grades.overall_readiness.label(),
            sop_effectiveness: grades.sop_effectiveness.label(),
            data_management_security: grades.data_management_security.label(),
            continuous_improvement: grades.continuous_improvement.label(),
        })?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
