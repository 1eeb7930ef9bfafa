use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    NewResponse, QuizStats, ResponseEvent, ResponseId, ResponseValidationError,
};
use super::repository::{RepositoryError, ResponseRepository};
use super::stats::aggregate;

static RESPONSE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_response_id() -> ResponseId {
    let id = RESPONSE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResponseId(format!("resp-{id:08}"))
}

/// Service composing validation, storage, and the statistics view.
pub struct ResponseService<R> {
    repository: Arc<R>,
}

impl<R> ResponseService<R>
where
    R: ResponseRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and persist one answered question.
    pub fn record(&self, response: NewResponse) -> Result<ResponseEvent, ResponseServiceError> {
        let weight = response.validate()?;
        let NewResponse {
            session_id,
            quiz_id,
            question_id,
            option_label,
            option_tag,
            ..
        } = response;

        let event = ResponseEvent {
            id: next_response_id(),
            session_id,
            quiz_id,
            question_id,
            option_label,
            option_tag,
            weight,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(event)?;
        tracing::debug!(
            response_id = %stored.id.0,
            quiz_id = %stored.quiz_id,
            question_id = %stored.question_id,
            "response recorded"
        );
        Ok(stored)
    }

    pub fn stats(&self, quiz_id: &str) -> Result<QuizStats, ResponseServiceError> {
        let events = self.repository.for_quiz(quiz_id)?;
        Ok(aggregate(quiz_id, &events))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseServiceError {
    #[error(transparent)]
    Validation(#[from] ResponseValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
