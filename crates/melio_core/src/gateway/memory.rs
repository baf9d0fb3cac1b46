//! In-memory concept gateway.
//!
//! Used when no database path is configured and by tests. Can be switched
//! into a failing mode to exercise persistence error paths.

use crate::gateway::{ConceptGateway, PersistenceError};
use crate::model::concept::Concept;
use crate::session::SessionId;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryConceptGateway {
    concepts: Mutex<HashMap<String, Vec<Concept>>>,
    failing: AtomicBool,
}

impl InMemoryConceptGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every call fails with `PersistenceError::Backend`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of concepts stored for `session`.
    pub fn count(&self, session: &SessionId) -> usize {
        self.concepts
            .lock()
            .map(|map| map.get(session.as_str()).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Concept>>>, PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Backend("in-memory store is failing".to_string()));
        }
        self.concepts
            .lock()
            .map_err(|_| PersistenceError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ConceptGateway for InMemoryConceptGateway {
    async fn append(&self, session: &SessionId, text: &str) -> Result<Concept, PersistenceError> {
        let concept = Concept::new(text);
        self.guard()?
            .entry(session.as_str().to_string())
            .or_default()
            .push(concept.clone());
        debug!("event=concept_append module=gateway status=ok backend=memory concept_id={}", concept.id);
        Ok(concept)
    }

    async fn list_all(&self, session: &SessionId) -> Result<Vec<Concept>, PersistenceError> {
        Ok(self
            .guard()?
            .get(session.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_all(&self, session: &SessionId) -> Result<usize, PersistenceError> {
        let removed = self
            .guard()?
            .remove(session.as_str())
            .map_or(0, |concepts| concepts.len());
        debug!("event=concept_delete_all module=gateway status=ok backend=memory removed={removed}");
        Ok(removed)
    }
}
