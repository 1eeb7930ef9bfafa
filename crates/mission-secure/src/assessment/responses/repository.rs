use std::sync::{Arc, Mutex};

use super::domain::ResponseEvent;

/// Storage abstraction for logged responses.
pub trait ResponseRepository: Send + Sync {
    fn insert(&self, event: ResponseEvent) -> Result<ResponseEvent, RepositoryError>;
    fn for_quiz(&self, quiz_id: &str) -> Result<Vec<ResponseEvent>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository; contents vanish on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResponseRepository {
    events: Arc<Mutex<Vec<ResponseEvent>>>,
}

impl InMemoryResponseRepository {
    pub fn len(&self) -> usize {
        self.events.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseRepository for InMemoryResponseRepository {
    fn insert(&self, event: ResponseEvent) -> Result<ResponseEvent, RepositoryError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| RepositoryError::Unavailable("response store poisoned".to_string()))?;
        if guard.iter().any(|existing| existing.id == event.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(event.clone());
        Ok(event)
    }

    fn for_quiz(&self, quiz_id: &str) -> Result<Vec<ResponseEvent>, RepositoryError> {
        let guard = self
            .events
            .lock()
            .map_err(|_| RepositoryError::Unavailable("response store poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|event| event.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}
