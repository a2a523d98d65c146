use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::task::JoinHandle;

use consent_form::config::ConsentConfig;
use consent_form::error::AppError;
use consent_form::workflows::consent::engine::load_json;
use consent_form::workflows::consent::{
    spawn_session, ConsentDispatcher, ConsentModel, FixtureRulesEngine, SessionHandle,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Rules engine used by the service: canned standards when a fixture path is
/// configured, otherwise an engine that answers with an empty list.
pub(crate) fn build_engine(config: &ConsentConfig) -> Result<FixtureRulesEngine, AppError> {
    match &config.standards_path {
        Some(path) => Ok(FixtureRulesEngine::from_path(path)?),
        None => Ok(FixtureRulesEngine::default()),
    }
}

pub(crate) fn load_scenario(config: &ConsentConfig) -> Result<Option<Value>, AppError> {
    config
        .scenario_path
        .as_ref()
        .map(|path| load_json(path).map_err(AppError::from))
        .transpose()
}

pub(crate) fn fresh_model(config: &ConsentConfig) -> ConsentModel {
    ConsentModel::new(config.activities.clone())
}

pub(crate) fn dispatcher(config: &ConsentConfig) -> ConsentDispatcher {
    ConsentDispatcher::new(config.error_ttl)
}

pub(crate) fn start_session(
    config: &ConsentConfig,
    engine: Arc<FixtureRulesEngine>,
) -> (SessionHandle, JoinHandle<()>) {
    spawn_session(fresh_model(config), dispatcher(config), engine)
}
