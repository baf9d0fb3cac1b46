//! Repository layer over SQLite storage.
//!
//! # Responsibility
//! - Keep SQL details for saved concepts inside the core persistence boundary.
//!
//! # Invariants
//! - Every query is scoped to one `(app_id, user_id)` pair.

pub mod concept_repo;
