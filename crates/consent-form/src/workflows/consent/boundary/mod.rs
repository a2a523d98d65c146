//! JSON contracts with the map integration and the rules engine.

pub mod inbound;
pub mod outbound;

pub use inbound::{decode_input, decode_property, decode_standards, DecodeError};
pub use outbound::GenerateStandardsRequest;
