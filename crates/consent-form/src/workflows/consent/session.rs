//! Event loop owning the consent model.
//!
//! Events are applied strictly one at a time in arrival order. Timers and
//! rules engine calls run as detached tasks and re-enter the loop as new
//! events, so the model never needs a lock.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::dispatch::{ConsentDispatcher, ConsentEffect, ConsentEvent};
use super::domain::ConsentModel;
use super::engine::RulesEngine;

#[derive(Debug)]
enum SessionMessage {
    Event {
        event: ConsentEvent,
        reply: Option<oneshot::Sender<ConsentModel>>,
    },
    Initialize(Value),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("consent session is no longer running")]
    Closed,
}

/// Clonable front door to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionMessage>,
    snapshots: watch::Receiver<ConsentModel>,
}

impl SessionHandle {
    /// Queue an event and wait for the model as it stands right after it.
    pub async fn dispatch(&self, event: ConsentEvent) -> Result<ConsentModel, SessionError> {
        let (reply, receiver) = oneshot::channel();
        self.events
            .send(SessionMessage::Event {
                event,
                reply: Some(reply),
            })
            .map_err(|_| SessionError::Closed)?;
        receiver.await.map_err(|_| SessionError::Closed)
    }

    /// Queue an event without waiting for it to be applied.
    pub fn notify(&self, event: ConsentEvent) -> Result<(), SessionError> {
        self.events
            .send(SessionMessage::Event { event, reply: None })
            .map_err(|_| SessionError::Closed)
    }

    /// Ask the rules engine to load a scenario. The resulting standards
    /// arrive later as a `ReceiveStandards` event.
    pub fn initialize(&self, scenario: Value) -> Result<(), SessionError> {
        self.events
            .send(SessionMessage::Initialize(scenario))
            .map_err(|_| SessionError::Closed)
    }

    pub fn snapshot(&self) -> ConsentModel {
        ConsentModel::clone(&self.snapshots.borrow())
    }

    /// Resolve once the published model satisfies `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&ConsentModel) -> bool,
    ) -> Result<ConsentModel, SessionError> {
        let mut snapshots = self.snapshots.clone();
        let model = snapshots
            .wait_for(|model| predicate(model))
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(ConsentModel::clone(&model))
    }
}

struct ConsentSession<E> {
    model: ConsentModel,
    dispatcher: ConsentDispatcher,
    engine: Arc<E>,
    feedback: mpsc::WeakUnboundedSender<SessionMessage>,
    inbox: mpsc::UnboundedReceiver<SessionMessage>,
    snapshots: watch::Sender<ConsentModel>,
}

/// Start a session task. It stops once every handle has been dropped.
pub fn spawn_session<E>(
    model: ConsentModel,
    dispatcher: ConsentDispatcher,
    engine: Arc<E>,
) -> (SessionHandle, JoinHandle<()>)
where
    E: RulesEngine + 'static,
{
    let (events, inbox) = mpsc::unbounded_channel();
    let (snapshots, snapshot_receiver) = watch::channel(model.clone());

    let session = ConsentSession {
        model,
        dispatcher,
        engine,
        feedback: events.downgrade(),
        inbox,
        snapshots,
    };
    let task = tokio::spawn(session.run());

    let handle = SessionHandle {
        events,
        snapshots: snapshot_receiver,
    };
    (handle, task)
}

impl<E> ConsentSession<E>
where
    E: RulesEngine + 'static,
{
    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            match message {
                SessionMessage::Event { event, reply } => {
                    self.apply(event);
                    if let Some(reply) = reply {
                        let _ = reply.send(self.model.clone());
                    }
                }
                SessionMessage::Initialize(scenario) => self.load_scenario(scenario),
            }
        }
        debug!("consent session stopped");
    }

    fn apply(&mut self, event: ConsentEvent) {
        debug!(event = event.name(), "applying consent event");
        let effects = self.dispatcher.update(&mut self.model, event);
        for effect in effects {
            self.run_effect(effect);
        }
        self.snapshots.send_replace(self.model.clone());
    }

    fn run_effect(&self, effect: ConsentEffect) {
        match effect {
            ConsentEffect::ScheduleExpiry { id, after } => {
                let feedback = self.feedback.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    deliver(&feedback, ConsentEvent::ExpireError(id));
                });
            }
            ConsentEffect::RequestStandards(request) => {
                let engine = Arc::clone(&self.engine);
                let feedback = self.feedback.clone();
                tokio::spawn(async move {
                    match engine.evaluate(request).await {
                        Ok(raw) => deliver(&feedback, ConsentEvent::ReceiveStandards(raw)),
                        Err(err) => {
                            error!(error = %err, "rules engine evaluation failed");
                            deliver(&feedback, ConsentEvent::StandardsUnavailable);
                        }
                    }
                });
            }
            ConsentEffect::Diagnostic(err) => {
                error!(channel = err.channel(), error = %err, "discarding malformed payload");
            }
        }
    }

    fn load_scenario(&self, scenario: Value) {
        let engine = Arc::clone(&self.engine);
        let feedback = self.feedback.clone();
        tokio::spawn(async move {
            match engine.initialize(scenario).await {
                Ok(raw) => deliver(&feedback, ConsentEvent::ReceiveStandards(raw)),
                Err(err) => {
                    error!(error = %err, "rules engine failed to load scenario");
                    deliver(&feedback, ConsentEvent::StandardsUnavailable);
                }
            }
        });
    }
}

fn deliver(feedback: &mpsc::WeakUnboundedSender<SessionMessage>, event: ConsentEvent) {
    match feedback.upgrade() {
        Some(sender) => {
            let _ = sender.send(SessionMessage::Event { event, reply: None });
        }
        None => warn!(event = event.name(), "session closed before event was delivered"),
    }
}
