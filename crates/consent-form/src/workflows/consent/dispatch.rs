use std::time::Duration;

use serde_json::Value;

use super::boundary::{decode_property, decode_standards, DecodeError, GenerateStandardsRequest};
use super::domain::{Activity, ConsentModel};
use super::errors::{
    ErrorId, GENERIC_ERROR, MISSING_ACTIVITY, MISSING_ACTIVITY_AND_PROPERTY, MISSING_PROPERTY,
};

/// Everything that can happen to a consent session.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentEvent {
    AddError(String),
    ExpireError(ErrorId),
    SelectActivity(Activity),
    SelectMapProperty(Value),
    ReceiveStandards(Value),
    /// The rules engine could not answer an outstanding request.
    StandardsUnavailable,
    GenerateStandards,
}

impl ConsentEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddError(_) => "add_error",
            Self::ExpireError(_) => "expire_error",
            Self::SelectActivity(_) => "select_activity",
            Self::SelectMapProperty(_) => "select_map_property",
            Self::ReceiveStandards(_) => "receive_standards",
            Self::StandardsUnavailable => "standards_unavailable",
            Self::GenerateStandards => "generate_standards",
        }
    }
}

/// Work the runtime performs on the dispatcher's behalf.
#[derive(Debug)]
pub enum ConsentEffect {
    /// Feed `ExpireError(id)` back in once `after` has elapsed.
    ScheduleExpiry { id: ErrorId, after: Duration },
    /// Send the request to the rules engine; its answer comes back as
    /// `ReceiveStandards`.
    RequestStandards(GenerateStandardsRequest),
    /// Developer-facing detail for a rejected payload.
    Diagnostic(DecodeError),
}

/// Pure transition function over an injected model.
#[derive(Debug, Clone, Copy)]
pub struct ConsentDispatcher {
    error_ttl: Duration,
}

impl ConsentDispatcher {
    pub fn new(error_ttl: Duration) -> Self {
        Self { error_ttl }
    }

    pub fn error_ttl(&self) -> Duration {
        self.error_ttl
    }

    pub fn update(&self, model: &mut ConsentModel, event: ConsentEvent) -> Vec<ConsentEffect> {
        let mut effects = Vec::new();

        match event {
            ConsentEvent::AddError(message) => self.add_error(model, message, &mut effects),
            ConsentEvent::ExpireError(id) => {
                model.errors.expire(id);
            }
            ConsentEvent::SelectActivity(activity) => {
                model.selected_activity = Some(activity);
            }
            ConsentEvent::SelectMapProperty(raw) => match decode_property(&raw) {
                Ok(property) => model.selected_property = Some(property),
                Err(err) => self.reject(model, err, &mut effects),
            },
            ConsentEvent::ReceiveStandards(raw) => {
                model.awaiting_standards = false;
                match decode_standards(&raw) {
                    Ok(standards) => model.standards = standards,
                    Err(err) => self.reject(model, err, &mut effects),
                }
            }
            ConsentEvent::StandardsUnavailable => {
                model.awaiting_standards = false;
                self.add_error(model, GENERIC_ERROR, &mut effects);
            }
            ConsentEvent::GenerateStandards => {
                let request = match (&model.selected_activity, &model.selected_property) {
                    (Some(activity), Some(property)) => {
                        Ok(GenerateStandardsRequest::new(activity, property))
                    }
                    (None, None) => Err(MISSING_ACTIVITY_AND_PROPERTY),
                    (None, Some(_)) => Err(MISSING_ACTIVITY),
                    (Some(_), None) => Err(MISSING_PROPERTY),
                };

                match request {
                    Ok(request) => {
                        model.awaiting_standards = true;
                        effects.push(ConsentEffect::RequestStandards(request));
                    }
                    Err(message) => self.add_error(model, message, &mut effects),
                }
            }
        }

        effects
    }

    fn add_error(
        &self,
        model: &mut ConsentModel,
        message: impl Into<String>,
        effects: &mut Vec<ConsentEffect>,
    ) {
        let id = model.errors.push(message);
        effects.push(ConsentEffect::ScheduleExpiry {
            id,
            after: self.error_ttl,
        });
    }

    fn reject(&self, model: &mut ConsentModel, err: DecodeError, effects: &mut Vec<ConsentEffect>) {
        effects.push(ConsentEffect::Diagnostic(err));
        self.add_error(model, GENERIC_ERROR, effects);
    }
}
