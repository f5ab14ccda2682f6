use super::checklist::ChecklistDefinition;
use super::domain::AuditError;
use super::export::{
    export_artifact, is_plain_file_name, ExportArtifact, ExportBundle, ExportError, ExportFormat,
    ExportOptions,
};
use super::submission::AuditSubmission;
use super::views::ChecklistView;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("'{0}' is not an audit export file name")]
    InvalidFilename(String),
    #[error("export file '{0}' not found")]
    NotFound(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptFile {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

/// Confirmation returned once a submission has been written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub message: String,
    pub basename: String,
    pub files: Vec<ReceiptFile>,
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Runs submissions through collection, assembly and export.
#[derive(Debug, Clone)]
pub struct AuditExportService {
    definition: ChecklistDefinition,
    output_dir: PathBuf,
    options: ExportOptions,
}

impl AuditExportService {
    pub fn new(
        definition: ChecklistDefinition,
        output_dir: impl Into<PathBuf>,
        options: ExportOptions,
    ) -> Self {
        Self {
            definition,
            output_dir: output_dir.into(),
            options,
        }
    }

    pub fn definition(&self) -> &ChecklistDefinition {
        &self.definition
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn checklist(&self) -> ChecklistView {
        ChecklistView::from_definition(&self.definition)
    }

    pub fn template(&self, today: NaiveDate) -> AuditSubmission {
        AuditSubmission::template(&self.definition, today)
    }

    /// Builds every artifact for the submission and writes them to the
    /// output directory.
    pub fn submit(
        &self,
        submission: AuditSubmission,
        today: NaiveDate,
    ) -> Result<SubmissionReceipt, AuditServiceError> {
        let report = submission.into_report(&self.definition, today)?;
        let bundle = ExportBundle::build(&report, &self.options)?;
        bundle.write_to(&self.output_dir)?;

        let files: Vec<ReceiptFile> = bundle
            .artifacts()
            .iter()
            .map(|artifact| ReceiptFile {
                filename: artifact.filename.clone(),
                content_type: artifact.content_type().to_string(),
                size: artifact.bytes.len(),
            })
            .collect();
        let names: Vec<&str> = files.iter().map(|file| file.filename.as_str()).collect();

        Ok(SubmissionReceipt {
            message: format!("保存しました: {}", names.join(", ")),
            basename: bundle.basename().to_string(),
            files,
        })
    }

    /// Builds a single artifact in memory without touching the disk.
    pub fn export(
        &self,
        submission: AuditSubmission,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<ExportArtifact, AuditServiceError> {
        let report = submission.into_report(&self.definition, today)?;
        let artifact = export_artifact(&report, format, &self.options.fonts)?;
        info!(filename = %artifact.filename, size = artifact.bytes.len(), "audit artifact exported");
        Ok(artifact)
    }

    pub fn stored_file(&self, filename: &str) -> Result<StoredFile, AuditServiceError> {
        if !is_export_filename(filename) {
            return Err(AuditServiceError::InvalidFilename(filename.to_string()));
        }

        match std::fs::read(self.output_dir.join(filename)) {
            Ok(bytes) => Ok(StoredFile {
                filename: filename.to_string(),
                bytes,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AuditServiceError::NotFound(filename.to_string()))
            }
            Err(err) => Err(ExportError::Io(err).into()),
        }
    }
}

fn is_export_filename(filename: &str) -> bool {
    let has_extension = [ExportFormat::Csv, ExportFormat::Pdf]
        .iter()
        .any(|format| filename.ends_with(&format!(".{}", format.extension())));

    filename.starts_with("audit_") && has_extension && is_plain_file_name(filename)
}
