//! Per-answer response logging and the aggregate statistics view.

pub mod dispatch;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod stats;

pub use dispatch::{
    HttpResponseLogger, LogWorkerSummary, ResponseLogError, ResponseLogTarget, ResponseLogWorker,
    ResponseSink,
};
pub use domain::{
    NewResponse, OptionStats, QuestionStats, QuizStats, ResponseEvent, ResponseId,
    ResponseValidationError,
};
pub use repository::{InMemoryResponseRepository, RepositoryError, ResponseRepository};
pub use router::response_router;
pub use service::{ResponseService, ResponseServiceError};
pub use stats::aggregate;
