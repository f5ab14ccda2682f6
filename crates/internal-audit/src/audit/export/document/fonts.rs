use crate::audit::export::ExportError;
use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// IPAex Gothic as installed by the `fonts-ipaexfont-gothic` package.
pub const DEFAULT_NATIVE_FONT: &str = "/usr/share/fonts/opentype/ipaexfont-gothic/ipaexg.ttf";
pub const DEFAULT_SYSTEM_FONT: &str = "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontTier {
    /// Font that renders Japanese natively.
    Native,
    /// Known system font file.
    System,
    /// PDF base-14 Helvetica. Japanese glyphs may not render.
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File { tier: FontTier, path: PathBuf },
    Builtin,
}

impl FontSource {
    pub fn tier(&self) -> FontTier {
        match self {
            Self::File { tier, .. } => *tier,
            Self::Builtin => FontTier::Builtin,
        }
    }

    fn load(&self, doc: &PdfDocumentReference) -> Result<IndirectFontRef, FontUnavailable> {
        match self {
            Self::File { path, .. } => {
                let bytes = std::fs::read(path).map_err(|source| FontUnavailable::Read {
                    path: path.clone(),
                    source,
                })?;
                doc.add_external_font(bytes.as_slice())
                    .map_err(|err| FontUnavailable::Rejected {
                        path: path.clone(),
                        reason: err.to_string(),
                    })
            }
            Self::Builtin => doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|err| FontUnavailable::Builtin(err.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum FontUnavailable {
    #[error("cannot read font file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("font file {} rejected: {reason}", .path.display())]
    Rejected { path: PathBuf, reason: String },
    #[error("builtin font rejected: {0}")]
    Builtin(String),
}

pub(crate) struct LoadedFont {
    pub(crate) font: IndirectFontRef,
    pub(crate) tier: FontTier,
}

/// Ordered font sources; the first one that loads is used for the whole
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChain {
    sources: Vec<FontSource>,
}

impl FontChain {
    /// Native font, then system font, then the builtin fallback.
    pub fn new(native: impl Into<PathBuf>, system: impl Into<PathBuf>) -> Self {
        Self {
            sources: vec![
                FontSource::File {
                    tier: FontTier::Native,
                    path: native.into(),
                },
                FontSource::File {
                    tier: FontTier::System,
                    path: system.into(),
                },
                FontSource::Builtin,
            ],
        }
    }

    pub fn builtin_only() -> Self {
        Self {
            sources: vec![FontSource::Builtin],
        }
    }

    pub fn from_sources(sources: Vec<FontSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[FontSource] {
        &self.sources
    }

    pub fn native_path(&self) -> Option<&Path> {
        self.sources.iter().find_map(|source| match source {
            FontSource::File {
                tier: FontTier::Native,
                path,
            } => Some(path.as_path()),
            _ => None,
        })
    }

    pub(crate) fn resolve(&self, doc: &PdfDocumentReference) -> Result<LoadedFont, ExportError> {
        for source in &self.sources {
            match source.load(doc) {
                Ok(font) => {
                    let tier = source.tier();
                    if tier == FontTier::Builtin {
                        warn!("using builtin Helvetica; Japanese text may not render");
                    } else {
                        debug!(?tier, "pdf font loaded");
                    }
                    return Ok(LoadedFont { font, tier });
                }
                Err(err) => warn!(error = %err, "font source unavailable, trying next"),
            }
        }

        Err(ExportError::FontsExhausted)
    }
}

impl Default for FontChain {
    fn default() -> Self {
        Self::new(DEFAULT_NATIVE_FONT, DEFAULT_SYSTEM_FONT)
    }
}
