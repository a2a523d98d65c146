use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use super::boundary::GenerateStandardsRequest;

/// Port to the external rules engine. Both calls answer with an untyped
/// standards list that goes back through the inbound decoder.
#[async_trait]
pub trait RulesEngine: Send + Sync {
    async fn evaluate(&self, request: GenerateStandardsRequest) -> Result<Value, RulesEngineError>;
    async fn initialize(&self, scenario: Value) -> Result<Value, RulesEngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RulesEngineError {
    #[error("rules engine unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read rules engine fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rules engine fixture {path} is not valid JSON: {source}")]
    FixtureFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Engine stand-in that answers from canned JSON. `initialize` echoes the
/// scenario it is given.
#[derive(Debug, Clone, Default)]
pub struct FixtureRulesEngine {
    standards: Option<Value>,
}

impl FixtureRulesEngine {
    pub fn new(standards: Value) -> Self {
        Self {
            standards: Some(standards),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesEngineError> {
        load_json(path).map(Self::new)
    }
}

#[async_trait]
impl RulesEngine for FixtureRulesEngine {
    async fn evaluate(&self, request: GenerateStandardsRequest) -> Result<Value, RulesEngineError> {
        tracing::debug!(
            activity = %request.activity,
            zone = %request.zone,
            "answering standards request from fixture"
        );
        Ok(self
            .standards
            .clone()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    async fn initialize(&self, scenario: Value) -> Result<Value, RulesEngineError> {
        Ok(scenario)
    }
}

/// Read a JSON document used as a scenario or fixture.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value, RulesEngineError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| RulesEngineError::Fixture {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RulesEngineError::FixtureFormat {
        path: path.display().to_string(),
        source,
    })
}
