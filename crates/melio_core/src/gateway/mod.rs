//! Persistence gateway for synthesized concepts.
//!
//! # Responsibility
//! - Define the session-scoped append/list/delete-all contract.
//! - Provide SQLite and in-memory adapters.
//!
//! # Invariants
//! - Gateways never see block state; they only store concept text.
//! - `delete_all` reports success only after every concept is gone.

use crate::db::DbError;
use crate::model::concept::Concept;
use crate::repo::concept_repo::RepoError;
use crate::session::SessionId;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryConceptGateway;
pub use sqlite::SqliteConceptGateway;

/// External append-only store of concepts, scoped per session.
#[async_trait]
pub trait ConceptGateway: Send + Sync {
    async fn append(&self, session: &SessionId, text: &str) -> Result<Concept, PersistenceError>;
    async fn list_all(&self, session: &SessionId) -> Result<Vec<Concept>, PersistenceError>;
    /// Deletes every concept of `session`; returns how many were removed.
    async fn delete_all(&self, session: &SessionId) -> Result<usize, PersistenceError>;
}

/// Failure of a persistence call.
#[derive(Debug)]
pub enum PersistenceError {
    /// No session yet, or the backing store is not ready.
    Unavailable,
    Db(DbError),
    InvalidData(String),
    /// Backend-specific failure without a richer type.
    Backend(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "concept storage is not available"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored concept: {message}"),
            Self::Backend(message) => write!(f, "concept storage failure: {message}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for PersistenceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            RepoError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

impl PersistenceError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
            Self::Backend(_) => "backend",
        }
    }
}
