//! Interaction controller.
//!
//! # Responsibility
//! - Own the canvas session state (`AppState`) explicitly; no ambient store.
//! - Turn pointer/UI/completion events into state transitions plus effect
//!   intents (`Effect`) that an outer driver executes.
//!
//! # Invariants
//! - `AppState::apply` performs no I/O and never blocks.
//! - At most one block is `dragging` after any event.
//! - A merge removes both sources and inserts the placeholder in one store
//!   transition, then ends the drag session.
//! - Completions addressed to a block that no longer exists are no-ops.

mod event;
pub mod messages;
mod state;
mod transition;

pub use event::{Effect, Event, ENTRY_ANIMATION_DURATION};
pub use state::{AppState, DragSession, Phase};
