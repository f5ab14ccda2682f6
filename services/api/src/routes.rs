use crate::infra::{attachment_headers, percent_encode, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use internal_audit::audit::export::ExportFormat;
use internal_audit::audit::views::ChecklistView;
use internal_audit::audit::{AuditExportService, AuditSubmission};
use internal_audit::error::AppError;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

const FILES_PATH: &str = "/api/v1/audit/files";

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionFile {
    pub(crate) filename: String,
    pub(crate) content_type: String,
    pub(crate) download_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) message: String,
    pub(crate) files: Vec<SubmissionFile>,
}

pub(crate) fn with_audit_routes(service: Arc<AuditExportService>) -> Router {
    audit_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) fn audit_router(service: Arc<AuditExportService>) -> Router {
    Router::new()
        .route("/api/v1/audit/checklist", get(checklist_handler))
        .route("/api/v1/audit/submissions", post(submit_handler))
        .route("/api/v1/audit/export.csv", post(export_csv_handler))
        .route("/api/v1/audit/export.pdf", post(export_pdf_handler))
        .route("/api/v1/audit/files/:filename", get(download_handler))
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn checklist_handler(State(service): State<Arc<AuditExportService>>) -> Json<ChecklistView> {
    Json(service.checklist())
}

async fn submit_handler(
    State(service): State<Arc<AuditExportService>>,
    Json(submission): Json<AuditSubmission>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let receipt = service.submit(submission, Local::now().date_naive())?;

    let files = receipt
        .files
        .into_iter()
        .map(|file| SubmissionFile {
            download_url: format!("{FILES_PATH}/{}", percent_encode(&file.filename)),
            filename: file.filename,
            content_type: file.content_type,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            message: receipt.message,
            files,
        }),
    ))
}

async fn export_csv_handler(
    State(service): State<Arc<AuditExportService>>,
    Json(submission): Json<AuditSubmission>,
) -> Result<Response, AppError> {
    export_download(&service, submission, ExportFormat::Csv)
}

async fn export_pdf_handler(
    State(service): State<Arc<AuditExportService>>,
    Json(submission): Json<AuditSubmission>,
) -> Result<Response, AppError> {
    export_download(&service, submission, ExportFormat::Pdf)
}

fn export_download(
    service: &AuditExportService,
    submission: AuditSubmission,
    format: ExportFormat,
) -> Result<Response, AppError> {
    let artifact = service.export(submission, format, Local::now().date_naive())?;
    let headers = attachment_headers(&artifact.filename, artifact.content_type().as_ref());
    Ok((StatusCode::OK, headers, artifact.bytes).into_response())
}

async fn download_handler(
    State(service): State<Arc<AuditExportService>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let file = service.stored_file(&filename)?;
    let content_type = mime_guess::from_path(&file.filename).first_or_octet_stream();
    let headers = attachment_headers(&file.filename, content_type.as_ref());
    Ok((StatusCode::OK, headers, file.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use internal_audit::audit::domain::{EvaluationDimension, Grade};
    use internal_audit::audit::export::document::FontChain;
    use internal_audit::audit::export::ExportOptions;
    use internal_audit::audit::ChecklistDefinition;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(dir: &std::path::Path) -> Router {
        let service = AuditExportService::new(
            ChecklistDefinition::standard(),
            dir,
            ExportOptions {
                include_document: true,
                fonts: FontChain::builtin_only(),
            },
        );
        audit_router(Arc::new(service))
    }

    fn submission(grades: &[EvaluationDimension]) -> AuditSubmission {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date");
        let mut submission = AuditSubmission::template(&ChecklistDefinition::standard(), date);
        submission.reviewer_name = "山本修司".to_string();
        for dimension in grades {
            submission.evaluations.insert(*dimension, Grade::Good);
        }
        submission
    }

    fn post_json(uri: &str, payload: &AuditSubmission) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(payload).unwrap()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable")
            .to_vec()
    }

    #[tokio::test]
    async fn checklist_route_lists_items_and_options() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = router(dir.path())
            .oneshot(
                Request::get("/api/v1/audit/checklist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["item_count"], 18);
        assert_eq!(body["categories"][0]["name"], "1. 会社情報と体制");
        assert_eq!(body["grade_options"], json!(["優", "良", "可", "不可"]));
    }

    #[tokio::test]
    async fn csv_export_downloads_in_memory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = submission(&EvaluationDimension::ordered());

        let response = router(dir.path())
            .oneshot(post_json("/api/v1/audit/export.csv", &payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment;"));
        assert!(disposition.contains(&percent_encode("audit_2024-04-01_山本修司.csv")));

        let body = String::from_utf8(body_bytes(response).await).expect("utf-8 csv");
        assert!(body.starts_with("カテゴリ,項目,対応状況,コメント,特記事項,"));
        assert_eq!(body.lines().count(), 19);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn pdf_export_returns_pdf_bytes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = submission(&EvaluationDimension::ordered());

        let response = router(dir.path())
            .oneshot(post_json("/api/v1/audit/export.pdf", &payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn incomplete_grades_are_unprocessable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = submission(&[EvaluationDimension::OverallReadiness]);

        let response = router(dir.path())
            .oneshot(post_json("/api/v1/audit/submissions", &payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("継続的改善の姿勢"));
    }

    #[tokio::test]
    async fn reviewer_name_with_separator_is_unprocessable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut payload = submission(&EvaluationDimension::ordered());
        payload.reviewer_name = "山本/QA".to_string();

        let response = router(dir.path())
            .oneshot(post_json("/api/v1/audit/submissions", &payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn submission_writes_files_that_can_be_downloaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let router = router(dir.path());
        let payload = submission(&EvaluationDimension::ordered());

        let response = router
            .clone()
            .oneshot(post_json("/api/v1/audit/submissions", &payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            body["message"],
            "保存しました: audit_2024-04-01_山本修司.csv, audit_2024-04-01_山本修司.pdf"
        );
        let pdf_url = body["files"][1]["download_url"]
            .as_str()
            .unwrap()
            .to_string();

        let download = router
            .oneshot(Request::get(pdf_url.as_str()).body(Body::empty()).unwrap())
            .await
            .expect("route responds");

        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(download.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(body_bytes(download).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn download_rejects_foreign_and_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let router = router(dir.path());

        let foreign = router
            .clone()
            .oneshot(
                Request::get("/api/v1/audit/files/notes.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route responds");
        assert_eq!(foreign.status(), StatusCode::BAD_REQUEST);

        let missing = router
            .oneshot(
                Request::get("/api/v1/audit/files/audit_2030-01-01_x.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route responds");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
