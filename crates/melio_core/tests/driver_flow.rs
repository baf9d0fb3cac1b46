use async_trait::async_trait;
use melio_core::controller::messages;
use melio_core::{
    AppState, BlockStore, Canvas, ConceptGateway, ConfiguredSession, Driver, Event,
    InMemoryConceptGateway, Position, SessionError, SessionId, SessionProvider, SynthesisError,
    SynthesisRequest, Synthesizer,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies from a fixed script after an optional delay and records requests.
struct ScriptedSynthesizer {
    replies: Mutex<VecDeque<Result<String, SynthesisError>>>,
    requests: Mutex<Vec<SynthesisRequest>>,
    delay: Duration,
}

impl ScriptedSynthesizer {
    fn new(replies: Vec<Result<String, SynthesisError>>) -> Self {
        Self::delayed(replies, Duration::ZERO)
    }

    fn delayed(replies: Vec<Result<String, SynthesisError>>, delay: Duration) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            delay,
        }
    }

    fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SynthesisError::EmptyResponse))
    }
}

struct PanickingSynthesizer;

#[async_trait]
impl Synthesizer for PanickingSynthesizer {
    async fn synthesize(&self, _request: &SynthesisRequest) -> Result<String, SynthesisError> {
        panic!("synthesizer bug");
    }
}

struct RejectingSession;

#[async_trait]
impl SessionProvider for RejectingSession {
    async fn establish(&self) -> Result<SessionId, SessionError> {
        Err(SessionError::SignInFailed("service offline".to_string()))
    }
}

struct Harness {
    driver: Driver,
    synthesizer: Arc<ScriptedSynthesizer>,
    gateway: Arc<InMemoryConceptGateway>,
}

fn canvas_state() -> AppState {
    AppState::with_store(BlockStore::with_seed(3), Canvas::new(1000.0, 600.0))
}

impl Harness {
    fn new(synthesizer: ScriptedSynthesizer) -> Self {
        let synthesizer = Arc::new(synthesizer);
        let gateway = Arc::new(InMemoryConceptGateway::new());
        let driver = Driver::new(
            canvas_state(),
            Arc::clone(&synthesizer) as Arc<dyn Synthesizer>,
            Arc::clone(&gateway) as Arc<dyn ConceptGateway>,
        );
        Self {
            driver,
            synthesizer,
            gateway,
        }
    }

    async fn sign_in(&mut self, user: &str) -> SessionId {
        self.driver
            .begin_session(Arc::new(ConfiguredSession::new(Some(user.to_string()))));
        self.driver.settle().await;
        self.driver.state().session().cloned().unwrap()
    }

    fn add(&mut self, text: &str, x: f64, y: f64) {
        self.driver.dispatch(Event::AddBlock {
            text: text.to_string(),
            position: Some(Position::new(x, y)),
        });
    }

    /// Adds two blocks and drags the second onto the first.
    fn merge_two(&mut self, dragged: &str, target: &str) {
        self.add(target, 0.0, 0.0);
        self.add(dragged, 600.0, 400.0);
        let id = self.driver.state().store().blocks()[1].id;
        self.driver.dispatch(Event::PointerDown {
            block: id,
            pointer: Position::new(600.0, 400.0),
        });
        self.driver.dispatch(Event::PointerMove {
            pointer: Position::new(20.0, 20.0),
        });
    }
}

#[tokio::test(start_paused = true)]
async fn merge_with_session_synthesizes_and_persists() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(vec![Ok(
        "Redstone castles that defend themselves".to_string(),
    )]));
    let session = harness.sign_in("alice").await;

    harness.merge_two("Redstone", "Castles");
    assert_eq!(harness.driver.state().pending_merges(), 1);
    harness.driver.settle().await;

    let state = harness.driver.state();
    assert_eq!(state.store().len(), 1);
    let block = &state.store().blocks()[0];
    assert_eq!(block.text, "Redstone castles that defend themselves");
    assert!(!block.generating);
    assert!(!block.just_created);
    assert_eq!(state.concepts().len(), 1);
    assert_eq!(harness.gateway.count(&session), 1);
    assert_eq!(harness.driver.in_flight(), 0);

    let requests = harness.synthesizer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_a, "Redstone");
    assert_eq!(requests[0].source_b, "Castles");
}

#[tokio::test(start_paused = true)]
async fn synthesis_failure_degrades_placeholder_and_skips_persistence() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(vec![Err(
        SynthesisError::Status {
            code: 429,
            body: "quota".to_string(),
        },
    )]));
    let session = harness.sign_in("alice").await;

    harness.merge_two("a", "b");
    harness.driver.settle().await;

    let state = harness.driver.state();
    let block = &state.store().blocks()[0];
    assert_eq!(block.text, "Error: connection failed!");
    assert!(!block.generating);
    assert!(state.error().is_some());
    assert_eq!(harness.gateway.count(&session), 0);
}

#[tokio::test(start_paused = true)]
async fn merge_without_session_still_updates_canvas() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(vec![Ok("offline idea".to_string())]));

    harness.merge_two("a", "b");
    harness.driver.settle().await;

    let state = harness.driver.state();
    assert!(state.session().is_none());
    assert_eq!(state.store().blocks()[0].text, "offline idea");
    assert!(state.concepts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn session_loads_previously_saved_concepts() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(Vec::new()));
    let alice = SessionId::new("alice").unwrap();
    harness.gateway.append(&alice, "from last time").await.unwrap();

    harness.sign_in("alice").await;

    let concepts = harness.driver.state().concepts();
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].text, "from last time");
}

#[tokio::test(start_paused = true)]
async fn rejected_sign_in_surfaces_error_and_keeps_canvas_usable() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(Vec::new()));
    harness.driver.begin_session(Arc::new(RejectingSession));
    harness.driver.settle().await;

    assert!(harness.driver.state().session().is_none());
    assert_eq!(
        harness.driver.state().error(),
        Some(messages::SIGN_IN_FAILED)
    );

    harness.add("still works", 10.0, 10.0);
    harness.driver.settle().await;
    assert_eq!(harness.driver.state().store().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_bulk_clear_keeps_blocks_and_concepts() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(vec![Ok("saved".to_string())]));
    let session = harness.sign_in("alice").await;
    harness.merge_two("a", "b");
    harness.driver.settle().await;

    harness.gateway.set_failing(true);
    harness.driver.dispatch(Event::ClearAll);
    harness.driver.settle().await;

    let state = harness.driver.state();
    assert_eq!(state.store().len(), 1);
    assert_eq!(state.concepts().len(), 1);
    assert_eq!(state.error(), Some(messages::CONCEPTS_CLEAR_FAILED));
    harness.gateway.set_failing(false);
    assert_eq!(harness.gateway.count(&session), 1);
}

#[tokio::test(start_paused = true)]
async fn bulk_clear_during_synthesis_drops_late_result() {
    let mut harness = Harness::new(ScriptedSynthesizer::delayed(
        vec![Ok("arrives too late".to_string())],
        Duration::from_secs(5),
    ));
    let session = harness.sign_in("alice").await;

    harness.merge_two("a", "b");
    harness.driver.dispatch(Event::ClearAll);
    harness.driver.settle().await;

    let state = harness.driver.state();
    assert!(state.store().is_empty());
    assert!(state.concepts().is_empty());
    assert_eq!(state.error(), None);
    assert_eq!(harness.gateway.count(&session), 0);
    assert_eq!(harness.driver.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn entry_animation_flag_clears_after_delay() {
    let mut harness = Harness::new(ScriptedSynthesizer::new(Vec::new()));
    harness.add("fresh", 10.0, 10.0);
    assert!(harness.driver.state().store().blocks()[0].just_created);

    harness.driver.settle().await;
    assert!(!harness.driver.state().store().blocks()[0].just_created);
}

#[tokio::test(start_paused = true)]
async fn panicking_synthesizer_still_settles_with_error_placeholder() {
    let gateway = Arc::new(InMemoryConceptGateway::new());
    let mut driver = Driver::new(canvas_state(), Arc::new(PanickingSynthesizer), gateway);
    for (text, x, y) in [("target", 0.0, 0.0), ("dragged", 600.0, 400.0)] {
        driver.dispatch(Event::AddBlock {
            text: text.to_string(),
            position: Some(Position::new(x, y)),
        });
    }
    let dragged = driver.state().store().blocks()[1].id;
    driver.dispatch(Event::PointerDown {
        block: dragged,
        pointer: Position::new(600.0, 400.0),
    });
    driver.dispatch(Event::PointerMove {
        pointer: Position::new(20.0, 20.0),
    });

    driver.settle().await;

    assert_eq!(driver.in_flight(), 0);
    let state = driver.state();
    assert_eq!(state.store().len(), 1);
    let block = &state.store().blocks()[0];
    assert!(!block.generating);
    assert_eq!(
        block.text,
        SynthesisError::Aborted(String::new()).placeholder_text()
    );
    assert!(state.error().is_some());
}
