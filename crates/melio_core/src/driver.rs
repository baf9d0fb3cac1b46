//! Effect executor around the interaction controller.
//!
//! # Responsibility
//! - Feed events into `AppState::apply` and run the returned effects.
//! - Route every effect completion back as an event on one channel.
//!
//! # Invariants
//! - `AppState` is only touched from the driver's own methods, so all state
//!   mutation happens on one logical thread.
//! - Each spawned effect posts exactly one completion event, even when its
//!   task panics.
//! - In-flight synthesis is never cancelled; a late completion for a removed
//!   placeholder is a no-op in the controller.

use crate::controller::{AppState, Effect, Event};
use crate::gateway::{ConceptGateway, PersistenceError};
use crate::session::{SessionError, SessionProvider};
use crate::synth::{SynthesisError, Synthesizer};
use log::{debug, error, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

const ABORTED: &str = "effect task ended without a result";

/// Owns the controller state and the external collaborators.
pub struct Driver {
    state: AppState,
    synthesizer: Arc<dyn Synthesizer>,
    gateway: Arc<dyn ConceptGateway>,
    completions_tx: UnboundedSender<Event>,
    completions_rx: UnboundedReceiver<Event>,
    in_flight: usize,
}

impl Driver {
    pub fn new(
        state: AppState,
        synthesizer: Arc<dyn Synthesizer>,
        gateway: Arc<dyn ConceptGateway>,
    ) -> Self {
        let (completions_tx, completions_rx) = unbounded_channel();
        Self {
            state,
            synthesizer,
            gateway,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of effects whose completion has not been processed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts session establishment; completes with `SessionEstablished` or
    /// `SessionFailed`. The controller keeps working without a session.
    pub fn begin_session(&mut self, provider: Arc<dyn SessionProvider>) {
        self.spawn_completion(
            "session",
            async move {
                match provider.establish().await {
                    Ok(session) => Event::SessionEstablished(session),
                    Err(err) => Event::SessionFailed(err),
                }
            },
            Event::SessionFailed(SessionError::SignInFailed(ABORTED.to_string())),
        );
    }

    /// Applies one event synchronously and launches its effects.
    pub fn dispatch(&mut self, event: Event) {
        let effects = self.state.apply(event);
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Waits for one completion and dispatches it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn process_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(event) => {
                self.in_flight -= 1;
                self.dispatch(event);
                true
            }
            None => {
                warn!("event=driver_recv module=driver status=error reason=channel_closed");
                self.in_flight = 0;
                false
            }
        }
    }

    /// Processes completions until no effect is in flight, including effects
    /// spawned by those completions.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    fn execute(&mut self, effect: Effect) {
        let name = effect.name();
        debug!("event=effect_start module=driver status=start effect={name}");
        match effect {
            Effect::Synthesize {
                placeholder,
                request,
            } => {
                let synthesizer = Arc::clone(&self.synthesizer);
                self.spawn_completion(
                    name,
                    async move {
                        let result = synthesizer.synthesize(&request).await;
                        Event::SynthesisCompleted {
                            placeholder,
                            result,
                        }
                    },
                    Event::SynthesisCompleted {
                        placeholder,
                        result: Err(SynthesisError::Aborted(ABORTED.to_string())),
                    },
                );
            }
            Effect::PersistConcept { session, text } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_completion(
                    name,
                    async move { Event::ConceptPersisted(gateway.append(&session, &text).await) },
                    Event::ConceptPersisted(Err(aborted_persistence())),
                );
            }
            Effect::LoadConcepts { session } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_completion(
                    name,
                    async move { Event::ConceptsLoaded(gateway.list_all(&session).await) },
                    Event::ConceptsLoaded(Err(aborted_persistence())),
                );
            }
            Effect::DeleteAllConcepts { session } => {
                let gateway = Arc::clone(&self.gateway);
                self.spawn_completion(
                    name,
                    async move { Event::ConceptsCleared(gateway.delete_all(&session).await) },
                    Event::ConceptsCleared(Err(aborted_persistence())),
                );
            }
            Effect::ScheduleEntryAnimationEnd { block, after } => {
                self.spawn_completion(
                    name,
                    async move {
                        tokio::time::sleep(after).await;
                        Event::EntryAnimationElapsed(block)
                    },
                    Event::EntryAnimationElapsed(block),
                );
            }
        }
    }

    /// Runs `task` on its own tokio task and posts its event.
    ///
    /// If the task panics or is cancelled, `on_abort` is posted instead, so
    /// every spawned effect still yields one completion.
    fn spawn_completion<F>(&mut self, name: &'static str, task: F, on_abort: Event)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        let handle = tokio::spawn(task);
        tokio::spawn(async move {
            let event = match handle.await {
                Ok(event) => event,
                Err(err) => {
                    error!(
                        "event=effect_complete module=driver status=error effect={name} panicked={}",
                        err.is_panic()
                    );
                    on_abort
                }
            };
            if tx.send(event).is_err() {
                debug!("event=effect_complete module=driver status=skip reason=driver_dropped");
            }
        });
    }
}

fn aborted_persistence() -> PersistenceError {
    PersistenceError::Backend(ABORTED.to_string())
}
