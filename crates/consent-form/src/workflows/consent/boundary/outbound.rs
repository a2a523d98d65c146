use serde::{Deserialize, Serialize};

use super::super::domain::{Activity, Property};

/// Payload handed to the rules engine when the user asks for standards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStandardsRequest {
    pub activity: String,
    pub zone: String,
    pub address: String,
    pub area_specific_layers: String,
    pub valuation_wufi: i64,
}

impl GenerateStandardsRequest {
    pub fn new(activity: &Activity, property: &Property) -> Self {
        Self {
            activity: activity.as_str().to_string(),
            zone: property.dp_zone.clone(),
            address: property.full_address.clone(),
            area_specific_layers: property.special_residential_area.clone(),
            valuation_wufi: property.valuation_wufi,
        }
    }
}
