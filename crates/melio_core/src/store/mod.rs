//! In-memory block storage.
//!
//! # Responsibility
//! - Hold the authoritative ordered set of blocks on the canvas.
//! - Apply whole mutations so callers never observe half-applied updates.
//!
//! # Invariants
//! - Iteration order is insertion order; collision tie-breaks depend on it.
//! - All mutations happen on the single logical thread that owns the store.

pub mod block_store;
