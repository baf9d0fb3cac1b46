//! Canvas domain model.
//!
//! # Responsibility
//! - Define the block record placed on the canvas and the persisted concept.
//! - Keep canvas geometry (bounds, clamping, random placement) next to the
//!   records it constrains.
//!
//! # Invariants
//! - Every block is identified by a stable `BlockId` never reused in a session.
//! - Block deletion is a hard removal; there is no tombstone.

pub mod appearance;
pub mod block;
pub mod canvas;
pub mod concept;
