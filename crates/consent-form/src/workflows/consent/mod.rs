//! Building consent form: model, boundary contracts, dispatcher, session
//! runtime, and HTML view.

pub mod boundary;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod router;
pub mod session;
pub mod view;

#[cfg(test)]
mod tests;

pub use boundary::{DecodeError, GenerateStandardsRequest};
pub use dispatch::{ConsentDispatcher, ConsentEffect, ConsentEvent};
pub use domain::{Activity, ConsentModel, Input, Property, Question, Standard, Status};
pub use engine::{FixtureRulesEngine, RulesEngine, RulesEngineError};
pub use errors::{ErrorId, ErrorQueue, TransientError, GENERIC_ERROR};
pub use router::consent_router;
pub use session::{spawn_session, SessionError, SessionHandle};
pub use view::{render_form, render_page};
