//! Concept repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Concepts are append-only; the only destructive call is `delete_concepts`.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - List order is insertion order (`created_at ASC, rowid ASC`).

use crate::db::DbError;
use crate::model::concept::{Concept, ConceptId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for concept persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted concept data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ownership scope of saved concepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptScope {
    pub app_id: String,
    pub user_id: String,
}

impl ConceptScope {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Repository interface for scoped concept storage.
pub trait ConceptRepository {
    fn insert_concept(&self, scope: &ConceptScope, concept: &Concept) -> RepoResult<ConceptId>;
    fn list_concepts(&self, scope: &ConceptScope) -> RepoResult<Vec<Concept>>;
    fn delete_concepts(&self, scope: &ConceptScope) -> RepoResult<usize>;
}

/// SQLite-backed concept repository.
pub struct SqliteConceptRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteConceptRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ConceptRepository for SqliteConceptRepository<'_> {
    fn insert_concept(&self, scope: &ConceptScope, concept: &Concept) -> RepoResult<ConceptId> {
        self.conn.execute(
            "INSERT INTO concepts (uuid, app_id, user_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                concept.id.to_string(),
                scope.app_id.as_str(),
                scope.user_id.as_str(),
                concept.text.as_str(),
                concept.created_at.timestamp_millis(),
            ],
        )?;

        Ok(concept.id)
    }

    fn list_concepts(&self, scope: &ConceptScope) -> RepoResult<Vec<Concept>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, text, created_at
             FROM concepts
             WHERE app_id = ?1 AND user_id = ?2
             ORDER BY created_at ASC, rowid ASC;",
        )?;

        let mut rows = stmt.query(params![scope.app_id.as_str(), scope.user_id.as_str()])?;
        let mut concepts = Vec::new();
        while let Some(row) = rows.next()? {
            concepts.push(parse_concept_row(row)?);
        }

        Ok(concepts)
    }

    fn delete_concepts(&self, scope: &ConceptScope) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM concepts WHERE app_id = ?1 AND user_id = ?2;",
            params![scope.app_id.as_str(), scope.user_id.as_str()],
        )?;
        tx.commit()?;
        Ok(removed)
    }
}

fn parse_concept_row(row: &Row<'_>) -> RepoResult<Concept> {
    let raw_id: String = row.get(0)?;
    let text: String = row.get(1)?;
    let created_at_ms: i64 = row.get(2)?;

    let id = Uuid::parse_str(&raw_id)
        .map_err(|err| RepoError::InvalidData(format!("invalid uuid `{raw_id}`: {err}")))?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("created_at out of range: {created_at_ms}"))
    })?;

    Ok(Concept::with_timestamp(id, text, created_at))
}
