use chrono::{Local, NaiveDate};
use clap::Args;
use internal_audit::audit::{AuditExportService, AuditSubmission, ChecklistDefinition};
use internal_audit::config::AppConfig;
use internal_audit::error::AppError;
use internal_audit::telemetry;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ChecklistArgs {
    /// Print a pre-filled submission template as JSON instead of the item list
    #[arg(long)]
    pub(crate) json: bool,
    /// Review date used in the template (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON file holding the submitted answers
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Directory for the exported files (defaults to AUDIT_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Skip the PDF report
    #[arg(long)]
    pub(crate) csv_only: bool,
    /// Fallback review date when the answers omit one (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_checklist(args: ChecklistArgs) -> Result<(), AppError> {
    let definition = ChecklistDefinition::standard();

    if args.json {
        let today = args.today.unwrap_or_else(|| Local::now().date_naive());
        let template = AuditSubmission::template(&definition, today);
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    print!("{}", render_checklist(&definition));
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        input,
        output_dir,
        csv_only,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let submission: AuditSubmission = serde_json::from_reader(BufReader::new(File::open(input)?))?;
    let service = AuditExportService::new(
        ChecklistDefinition::standard(),
        output_dir.unwrap_or_else(|| config.export.output_dir.clone()),
        config.export.export_options(!csv_only),
    );

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let receipt = service.submit(submission, today)?;
    for file in &receipt.files {
        println!(
            "保存しました: {}",
            service.output_dir().join(&file.filename).display()
        );
    }

    Ok(())
}

fn render_checklist(definition: &ChecklistDefinition) -> String {
    let mut out = String::from("Imaging CRO 内部監査チェックシート\n");
    for category in definition.categories() {
        out.push_str(&format!("\n{}\n", category.name));
        for item in &category.items {
            out.push_str(&format!("- {item}\n"));
        }
    }
    out.push_str(&format!("\n{} items\n", definition.item_count()));
    out
}
