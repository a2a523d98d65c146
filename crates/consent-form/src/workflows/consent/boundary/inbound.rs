use serde::Deserialize;
use serde_json::Value;

use super::super::domain::{Input, Property, Standard};

/// Structural decode failure for an inbound payload. No partial value is
/// ever produced.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("property selection payload rejected: {0}")]
    Property(#[source] serde_json::Error),
    #[error("standards payload rejected: {0}")]
    Standards(#[source] serde_json::Error),
}

impl DecodeError {
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::Property(_) => "property_selection",
            Self::Standards(_) => "standards_response",
        }
    }
}

pub fn decode_property(raw: &Value) -> Result<Property, DecodeError> {
    Property::deserialize(raw).map_err(DecodeError::Property)
}

pub fn decode_standards(raw: &Value) -> Result<Vec<Standard>, DecodeError> {
    Vec::<Standard>::deserialize(raw).map_err(DecodeError::Standards)
}

pub fn decode_input(raw: &Value) -> Result<Input, serde_json::Error> {
    Input::deserialize(raw)
}
