use crate::collision::Footprint;
use crate::model::appearance::Appearance;
use crate::model::block::{BlockId, Position};
use crate::model::canvas::Canvas;
use crate::model::concept::Concept;
use crate::session::SessionId;
use crate::store::block_store::BlockStore;

/// Active drag: which block the pointer holds and where it grabbed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub block: BlockId,
    /// Pointer position minus block origin at pointer-down.
    pub offset: Position,
}

/// Coarse interaction phase derived from state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Dragging(BlockId),
}

/// Owned canvas session state. Mutated only through [`AppState::apply`].
pub struct AppState {
    pub(super) store: BlockStore,
    pub(super) canvas: Canvas,
    pub(super) footprint: Footprint,
    pub(super) drag: Option<DragSession>,
    pub(super) delete_mode: bool,
    pub(super) session: Option<SessionId>,
    pub(super) concepts: Vec<Concept>,
    pub(super) error: Option<String>,
    pub(super) appearance: Appearance,
}

impl AppState {
    pub fn new(canvas: Canvas) -> Self {
        Self::with_store(BlockStore::new(), canvas)
    }

    /// Builds state around a caller-provided store (e.g. a seeded one).
    pub fn with_store(store: BlockStore, canvas: Canvas) -> Self {
        Self {
            store,
            canvas,
            footprint: Footprint::default(),
            drag: None,
            delete_mode: false,
            session: None,
            concepts: Vec::new(),
            error: None,
            appearance: Appearance::default(),
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn phase(&self) -> Phase {
        match self.drag {
            Some(session) => Phase::Dragging(session.block),
            None => Phase::Idle,
        }
    }

    pub fn is_delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Saved concepts of the current session, in storage order.
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Latest session-level error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Number of merges whose synthesis has not completed yet.
    pub fn pending_merges(&self) -> usize {
        self.store.iter().filter(|block| block.generating).count()
    }
}
