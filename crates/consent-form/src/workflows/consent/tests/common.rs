use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::consent::boundary::GenerateStandardsRequest;
use crate::workflows::consent::dispatch::{ConsentDispatcher, ConsentEffect, ConsentEvent};
use crate::workflows::consent::domain::{Activity, ConsentModel};
use crate::workflows::consent::engine::{RulesEngine, RulesEngineError};

pub(super) const ERROR_TTL: Duration = Duration::from_millis(5000);

pub(super) fn activities() -> Vec<Activity> {
    vec![
        Activity::new("Build a deck"),
        Activity::new("Build a fence"),
        Activity::new("Construct a garage"),
    ]
}

pub(super) fn model() -> ConsentModel {
    ConsentModel::new(activities())
}

pub(super) fn dispatcher() -> ConsentDispatcher {
    ConsentDispatcher::new(ERROR_TTL)
}

pub(super) fn property_json() -> Value {
    json!({
        "fullAddress": "12 Main St, Ponsonby, Auckland 1011",
        "streetNumber": "12",
        "streetName": "Main St",
        "suburb": "Ponsonby",
        "postCode": "1011",
        "title": "NA123/45",
        "valuationId": "12345-67890",
        "valuationWufi": 500,
        "dpZone": "R1",
        "specialResidentialArea": "none"
    })
}

pub(super) fn property_json_without(field: &str) -> Value {
    let mut raw = property_json();
    raw.as_object_mut()
        .expect("property payload is an object")
        .remove(field);
    raw
}

pub(super) fn standard_json(key: &str, name: &str) -> Value {
    json!({
        "key": key,
        "description": format!("Rules covering {name}"),
        "name": name,
        "section": "Residential",
        "activityStatus": "Controlled",
        "questions": [
            {
                "key": "height",
                "unit": "m",
                "input": { "format": "number", "prompt": "Height of the structure" }
            },
            {
                "key": "material",
                "unit": "",
                "value": "timber",
                "input": {
                    "format": "multichoice",
                    "prompt": "Cladding &amp; finish",
                    "options": ["timber", "brick"]
                }
            },
            {
                "key": "plans",
                "unit": "",
                "input": { "format": "file", "prompt": "Upload site plans" }
            }
        ]
    })
}

pub(super) fn standards_json(keys: &[&str]) -> Value {
    Value::Array(
        keys.iter()
            .map(|key| standard_json(key, &format!("Standard {key}")))
            .collect(),
    )
}

/// Apply events in order, collecting every effect produced.
pub(super) fn replay(
    dispatcher: &ConsentDispatcher,
    model: &mut ConsentModel,
    events: Vec<ConsentEvent>,
) -> Vec<ConsentEffect> {
    events
        .into_iter()
        .flat_map(|event| dispatcher.update(model, event))
        .collect()
}

/// Rules engine double recording every request it receives.
#[derive(Default, Clone)]
pub(super) struct RecordingEngine {
    pub(super) requests: Arc<Mutex<Vec<GenerateStandardsRequest>>>,
    pub(super) answer: Option<Value>,
}

impl RecordingEngine {
    pub(super) fn answering(answer: Value) -> Self {
        Self {
            requests: Arc::default(),
            answer: Some(answer),
        }
    }

    pub(super) fn requests(&self) -> Vec<GenerateStandardsRequest> {
        self.requests.lock().expect("engine mutex poisoned").clone()
    }
}

#[async_trait]
impl RulesEngine for RecordingEngine {
    async fn evaluate(&self, request: GenerateStandardsRequest) -> Result<Value, RulesEngineError> {
        self.requests
            .lock()
            .expect("engine mutex poisoned")
            .push(request);
        self.answer
            .clone()
            .ok_or_else(|| RulesEngineError::Unavailable("no answer configured".to_string()))
    }

    async fn initialize(&self, scenario: Value) -> Result<Value, RulesEngineError> {
        Ok(scenario)
    }
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
