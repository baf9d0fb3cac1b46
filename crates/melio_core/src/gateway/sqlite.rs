//! SQLite concept gateway.
//!
//! # Invariants
//! - One connection per gateway, serialized behind a mutex.
//! - Every call is scoped by the configured `app_id` and the caller's session.
//! - SQLite work runs on tokio's blocking pool, never on an async worker.

use crate::db::{open_db, open_db_in_memory};
use crate::gateway::{ConceptGateway, PersistenceError};
use crate::model::concept::Concept;
use crate::repo::concept_repo::{ConceptRepository, ConceptScope, SqliteConceptRepository};
use crate::session::SessionId;
use async_trait::async_trait;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task;

/// Concept gateway persisting to a local SQLite database.
pub struct SqliteConceptGateway {
    conn: Arc<Mutex<Connection>>,
    app_id: String,
}

impl SqliteConceptGateway {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, app_id: impl Into<String>) -> Result<Self, PersistenceError> {
        Ok(Self::with_connection(open_db(path)?, app_id))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(app_id: impl Into<String>) -> Result<Self, PersistenceError> {
        Ok(Self::with_connection(open_db_in_memory()?, app_id))
    }

    /// Wraps an already-migrated connection.
    pub fn with_connection(conn: Connection, app_id: impl Into<String>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            app_id: app_id.into(),
        }
    }

    fn scope(&self, session: &SessionId) -> ConceptScope {
        ConceptScope::new(self.app_id.as_str(), session.as_str())
    }

    /// Runs `op` against the repository on the blocking pool.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, PersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConceptRepository<'_>) -> Result<T, PersistenceError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| PersistenceError::Backend("connection lock poisoned".to_string()))?;
            op(&SqliteConceptRepository::new(&conn))
        })
        .await
        .map_err(|err| PersistenceError::Backend(format!("storage task failed: {err}")))?
    }
}

#[async_trait]
impl ConceptGateway for SqliteConceptGateway {
    async fn append(&self, session: &SessionId, text: &str) -> Result<Concept, PersistenceError> {
        let scope = self.scope(session);
        let concept = Concept::new(text);
        let row = concept.clone();
        let result = self
            .run_blocking(move |repo| {
                repo.insert_concept(&scope, &row)?;
                Ok(())
            })
            .await
            .map(|()| concept);
        log_outcome("concept_append", &result, |concept| {
            format!("concept_id={}", concept.id)
        });
        result
    }

    async fn list_all(&self, session: &SessionId) -> Result<Vec<Concept>, PersistenceError> {
        let scope = self.scope(session);
        let result = self
            .run_blocking(move |repo| Ok(repo.list_concepts(&scope)?))
            .await;
        log_outcome("concept_list", &result, |concepts| {
            format!("count={}", concepts.len())
        });
        result
    }

    async fn delete_all(&self, session: &SessionId) -> Result<usize, PersistenceError> {
        let scope = self.scope(session);
        let result = self
            .run_blocking(move |repo| Ok(repo.delete_concepts(&scope)?))
            .await;
        log_outcome("concept_delete_all", &result, |removed| {
            format!("removed={removed}")
        });
        result
    }
}

fn log_outcome<T>(
    event: &str,
    result: &Result<T, PersistenceError>,
    describe: impl FnOnce(&T) -> String,
) {
    match result {
        Ok(value) => info!(
            "event={event} module=gateway status=ok backend=sqlite {}",
            describe(value)
        ),
        Err(err) => error!(
            "event={event} module=gateway status=error backend=sqlite error_code={} error={err}",
            err.code()
        ),
    }
}
