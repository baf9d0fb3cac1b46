//! Persisted concept record.
//!
//! # Invariants
//! - A concept is immutable once written.
//! - The only persistence operations are append and delete-all per session.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a stored concept.
pub type ConceptId = Uuid;

/// A synthesized concept as stored by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Concept {
    /// Creates a concept stamped with the current time, at the millisecond
    /// precision storage keeps.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_timestamp(Uuid::new_v4(), text, Utc::now().trunc_subsecs(3))
    }

    /// Rebuilds a concept from stored identity and timestamp.
    pub fn with_timestamp(
        id: ConceptId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
        }
    }
}
