use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_audit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use internal_audit::audit::{AuditExportService, ChecklistDefinition};
use internal_audit::config::AppConfig;
use internal_audit::error::AppError;
use internal_audit::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let audit_service = Arc::new(AuditExportService::new(
        ChecklistDefinition::standard(),
        config.export.output_dir.clone(),
        config.export.export_options(true),
    ));

    let app = with_audit_routes(audit_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        output_dir = %config.export.output_dir.display(),
        "internal audit service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
