mod checklist;
mod collector;
pub mod domain;
pub mod export;
mod report;
mod service;
mod submission;
pub mod views;

pub use checklist::{ChecklistCategory, ChecklistDefinition, SPECIAL_NOTES_HEADING};
pub use collector::{collect_responses, FormInput, ItemAnswer};
pub use report::{AuditReport, Evaluations, ReviewDraft, ReviewMetadata};
pub use service::{AuditExportService, AuditServiceError, StoredFile, SubmissionReceipt};
pub use submission::AuditSubmission;
