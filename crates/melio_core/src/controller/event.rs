use crate::gateway::PersistenceError;
use crate::model::appearance::Appearance;
use crate::model::block::{BlockId, Position};
use crate::model::canvas::Canvas;
use crate::model::concept::Concept;
use crate::session::{SessionError, SessionId};
use crate::synth::{SynthesisError, SynthesisRequest};
use std::time::Duration;

/// Delay after which a new block's entry animation flag is cleared.
pub const ENTRY_ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Input to the interaction controller: UI gestures and effect completions.
#[derive(Debug)]
pub enum Event {
    CanvasResized(Canvas),
    /// Text from the input bar; placed randomly when `position` is `None`.
    AddBlock {
        text: String,
        position: Option<Position>,
    },
    ToggleDeleteMode,
    /// `pointer` is in canvas coordinates.
    PointerDown {
        block: BlockId,
        pointer: Position,
    },
    PointerMove {
        pointer: Position,
    },
    PointerUp,
    ToggleExpanded(BlockId),
    DismissError,
    SetAppearance(Appearance),
    ClearAll,
    EntryAnimationElapsed(BlockId),
    SynthesisCompleted {
        placeholder: BlockId,
        result: Result<String, SynthesisError>,
    },
    ConceptPersisted(Result<Concept, PersistenceError>),
    ConceptsLoaded(Result<Vec<Concept>, PersistenceError>),
    ConceptsCleared(Result<usize, PersistenceError>),
    SessionEstablished(SessionId),
    SessionFailed(SessionError),
}

/// Side-effect intent returned by a transition, executed by the driver.
///
/// Every effect eventually yields exactly one completion `Event`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Completes with `Event::SynthesisCompleted`.
    Synthesize {
        placeholder: BlockId,
        request: SynthesisRequest,
    },
    /// Completes with `Event::ConceptPersisted`.
    PersistConcept { session: SessionId, text: String },
    /// Completes with `Event::ConceptsLoaded`.
    LoadConcepts { session: SessionId },
    /// Completes with `Event::ConceptsCleared`.
    DeleteAllConcepts { session: SessionId },
    /// Completes with `Event::EntryAnimationElapsed` after `after`.
    ScheduleEntryAnimationEnd { block: BlockId, after: Duration },
}

impl Effect {
    /// Stable short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Synthesize { .. } => "synthesize",
            Self::PersistConcept { .. } => "persist_concept",
            Self::LoadConcepts { .. } => "load_concepts",
            Self::DeleteAllConcepts { .. } => "delete_all_concepts",
            Self::ScheduleEntryAnimationEnd { .. } => "entry_animation",
        }
    }
}
