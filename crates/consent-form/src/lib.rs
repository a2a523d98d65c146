//! Building consent proof of concept.
//!
//! A user picks an activity and a property, the rules engine answers with the
//! applicable standards, and the standards are rendered as a question form.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
