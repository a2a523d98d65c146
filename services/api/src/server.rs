use crate::cli::ServeArgs;
use crate::infra::{build_engine, load_scenario, start_session, AppState};
use crate::routes::with_consent_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use consent_form::config::AppConfig;
use consent_form::error::AppError;
use consent_form::telemetry;
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

    let engine = Arc::new(build_engine(&config.consent)?);
    let (session, _session_task) = start_session(&config.consent, engine);

    if let Some(scenario) = load_scenario(&config.consent)? {
        session.initialize(scenario)?;
        info!(
            scenario = ?config.consent.scenario_path,
            "initial standards scenario requested"
        );
    }

    let app = with_consent_routes(session)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        activities = config.consent.activities.len(),
        error_ttl_ms = config.consent.error_ttl.as_millis() as u64,
        "building consent form ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
