use chrono::NaiveDate;
use internal_audit::audit::domain::{AuditError, EvaluationDimension, Grade, ItemStatus};
use internal_audit::audit::export::document::{self, FontChain, FontTier};
use internal_audit::audit::export::{tabular, ExportBundle, ExportFormat, ExportOptions};
use internal_audit::audit::{collect_responses, AuditReport, ChecklistDefinition, FormInput, ReviewDraft};

fn review_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid review date")
}

fn default_report(definition: &ChecklistDefinition) -> AuditReport {
    let draft = ReviewDraft::new("山本修司", review_date()).with_uniform_grade(Grade::Good);
    AuditReport::from_form(definition, &FormInput::defaults(definition), draft)
        .expect("default form assembles")
}

#[test]
fn collector_mirrors_definition_positions() {
    let definition = ChecklistDefinition::standard();
    let mut input = FormInput::defaults(&definition);
    input.set_status("教育研修SOPの整備状況", ItemStatus::Confirmed);

    let responses = collect_responses(&definition, &input).expect("responses collected");

    assert_eq!(responses.len(), definition.item_count());
    for (response, item) in responses.iter().zip(definition.items()) {
        assert_eq!((response.category, response.label), (item.category, item.label));
    }
}

#[test]
fn default_scenario_exports_expected_csv_and_filename() {
    let definition = ChecklistDefinition::standard();
    let report = default_report(&definition);

    let bundle = ExportBundle::build(
        &report,
        &ExportOptions {
            include_document: false,
            fonts: FontChain::builtin_only(),
        },
    )
    .expect("bundle builds");
    let csv = bundle.artifact(ExportFormat::Csv).expect("csv artifact");
    assert_eq!(csv.filename, "audit_2024-04-01_山本修司.csv");
    assert_eq!(csv.content_type().as_ref(), "text/csv");

    let mut reader = csv::Reader::from_reader(csv.bytes.as_slice());
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("csv parses");
    assert_eq!(rows.len(), 18);
    assert_eq!(&rows[0][0], "1. 会社情報と体制");
    assert_eq!(&rows[0][1], "会社概要・所在地・人員構成");
    assert_eq!(&rows[0][2], "未確認");
    assert_eq!(&rows[0][3], "");
    for row in &rows {
        assert_eq!(row.iter().skip(5).collect::<Vec<_>>(), vec!["良"; 4]);
    }
}

#[test]
fn tabular_export_is_deterministic() {
    let definition = ChecklistDefinition::standard();
    let report = default_report(&definition);

    let first = tabular::render(&report).expect("first render");
    let second = tabular::render(&report).expect("second render");
    assert_eq!(first, second);
    assert!(std::str::from_utf8(&first)
        .expect("utf-8 output")
        .starts_with("カテゴリ,項目,対応状況,コメント,特記事項,"));
}

#[test]
fn assembly_requires_all_four_grades() {
    let definition = ChecklistDefinition::standard();
    let responses =
        collect_responses(&definition, &FormInput::defaults(&definition)).expect("collects");
    let draft = ReviewDraft::new("山本修司", review_date())
        .with_grade(EvaluationDimension::OverallReadiness, Grade::Good)
        .with_grade(EvaluationDimension::SopEffectiveness, Grade::Good)
        .with_grade(EvaluationDimension::DataManagementSecurity, Grade::Good);

    let err = AuditReport::assemble(responses, draft).expect_err("one grade missing");
    assert_eq!(
        err,
        AuditError::IncompleteMetadata {
            missing: vec![EvaluationDimension::ContinuousImprovement],
        }
    );
}

#[test]
fn document_export_falls_back_and_keeps_summary_shape() {
    let definition = ChecklistDefinition::standard();
    let report = default_report(&definition);
    let dir = tempfile::tempdir().expect("temp dir");
    let fonts = FontChain::new(dir.path().join("ipaexg.ttf"), dir.path().join("system.ttf"));

    let rendered = document::render(&report, &fonts).expect("document renders");

    assert_eq!(rendered.font, FontTier::Builtin);
    assert!(rendered.bytes.starts_with(b"%PDF"));
    let table = rendered.layout.summary_table().expect("summary table");
    assert_eq!(table.row_count(), 5);
    let dimensions: Vec<EvaluationDimension> = table.rows.iter().map(|row| row.dimension).collect();
    assert_eq!(dimensions, EvaluationDimension::ordered().to_vec());
}

#[test]
fn document_export_prefers_system_font_over_rejected_native() {
    let definition = ChecklistDefinition::standard();
    let report = default_report(&definition);
    let dir = tempfile::tempdir().expect("temp dir");
    let native = dir.path().join("ipaexg.ttf");
    std::fs::write(&native, b"\x00\x01 truncated").expect("garbage written");
    let system = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");

    let rendered = document::render(&report, &FontChain::new(native, system)).expect("document renders");

    assert_eq!(rendered.font, FontTier::System);
    assert!(rendered.bytes.starts_with(b"%PDF"));
}
