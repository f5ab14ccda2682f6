//! File artifacts produced from an [`AuditReport`].
//!
//! Both exporters read the same report independently: [`tabular`] writes the
//! flat CSV and [`document`] lays out and renders the PDF. [`ExportBundle`]
//! names the artifacts and writes them to disk.

pub mod document;
pub mod tabular;

use super::report::AuditReport;
use chrono::NaiveDate;
use document::{FontChain, FontTier};
use mime::Mime;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render PDF report: {0}")]
    Pdf(String),
    #[error("no usable font source for the PDF report")]
    FontsExhausted,
    #[error("'{0}' cannot be used as an export file name")]
    UnsafeFileName(String),
}

/// `audit_<date>_<reviewer>` with ASCII spaces in the reviewer name replaced.
pub fn export_basename(review_date: NaiveDate, reviewer_name: &str) -> String {
    format!(
        "audit_{}_{}",
        review_date.format("%Y-%m-%d"),
        reviewer_name.replace(' ', "_")
    )
}

/// True when `name` is exactly one plain path component, so joining it onto
/// a directory cannot leave that directory.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> Mime {
        match self {
            Self::Csv => mime::TEXT_CSV,
            Self::Pdf => mime::APPLICATION_PDF,
        }
    }

    pub fn file_name(self, basename: &str) -> String {
        format!("{basename}.{}", self.extension())
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn content_type(&self) -> Mime {
        self.format.mime()
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Render the PDF report alongside the CSV.
    pub include_document: bool,
    pub fonts: FontChain,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_document: true,
            fonts: FontChain::default(),
        }
    }
}

/// Exports a single artifact of the requested format.
pub fn export_artifact(
    report: &AuditReport,
    format: ExportFormat,
    fonts: &FontChain,
) -> Result<ExportArtifact, ExportError> {
    render_artifact(report, format, fonts).map(|(artifact, _)| artifact)
}

// Also reports the font tier when the artifact is the PDF document.
fn render_artifact(
    report: &AuditReport,
    format: ExportFormat,
    fonts: &FontChain,
) -> Result<(ExportArtifact, Option<FontTier>), ExportError> {
    let filename = format.file_name(&report.export_basename());
    if !is_plain_file_name(&filename) {
        return Err(ExportError::UnsafeFileName(filename));
    }

    let (bytes, font) = match format {
        ExportFormat::Csv => (tabular::render(report)?, None),
        ExportFormat::Pdf => {
            let rendered = document::render(report, fonts)?;
            (rendered.bytes, Some(rendered.font))
        }
    };

    Ok((
        ExportArtifact {
            filename,
            format,
            bytes,
        },
        font,
    ))
}

#[derive(Debug, Clone)]
pub struct ExportBundle {
    basename: String,
    artifacts: Vec<ExportArtifact>,
    font: Option<FontTier>,
}

impl ExportBundle {
    pub fn build(report: &AuditReport, options: &ExportOptions) -> Result<Self, ExportError> {
        let basename = report.export_basename();
        let (csv, _) = render_artifact(report, ExportFormat::Csv, &options.fonts)?;
        let mut artifacts = vec![csv];

        let mut font = None;
        if options.include_document {
            let (pdf, tier) = render_artifact(report, ExportFormat::Pdf, &options.fonts)?;
            font = tier;
            artifacts.push(pdf);
        }

        info!(
            basename = %basename,
            items = report.responses().len(),
            artifacts = artifacts.len(),
            font = ?font,
            "audit export prepared"
        );

        Ok(Self {
            basename,
            artifacts,
            font,
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn artifacts(&self) -> &[ExportArtifact] {
        &self.artifacts
    }

    pub fn artifact(&self, format: ExportFormat) -> Option<&ExportArtifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.format == format)
    }

    /// Font tier used by the PDF artifact, if one was rendered.
    pub fn font(&self) -> Option<FontTier> {
        self.font
    }

    /// Writes every artifact into `dir`, creating it when absent. Either all
    /// artifacts are written or none remain: files from this call are removed
    /// again when a later write fails.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            if !is_plain_file_name(&artifact.filename) {
                remove_written(&written);
                return Err(ExportError::UnsafeFileName(artifact.filename.clone()));
            }

            let path = dir.join(&artifact.filename);
            if let Err(err) = fs::write(&path, &artifact.bytes) {
                remove_written(&written);
                return Err(err.into());
            }
            info!(path = %path.display(), "audit export written");
            written.push(path);
        }

        Ok(written)
    }
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %err, "could not remove partial export");
        }
    }
}
