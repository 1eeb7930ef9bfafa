//! Mission Secure self-assessment: catalog, scoring, refinement, and logging.
//!
//! A [`QuizSession`] walks a shuffled copy of the catalog and produces an
//! [`AnswerMap`]. The [`Assessor`] scores that map locally, optionally asks a
//! [`Refiner`] for an adjusted score, and assembles an [`AssessmentReport`].

pub mod assessor;
pub mod catalog;
pub mod domain;
pub mod refinement;
pub mod report;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod session;
pub mod shuffle;

#[cfg(test)]
mod tests;

pub use assessor::Assessor;
pub use catalog::{standard_catalog, CatalogError, QuestionCatalog, QUIZ_ID};
pub use domain::{
    AnswerMap, AnswerOption, AnswerTag, AnswerWeight, Category, PostureSignal, Question,
    QuestionId,
};
pub use refinement::{
    merge_reply, refine_or_fallback, GradeServiceClient, OpenAiRefiner, RefinedScore,
    RefinementError, RefinementRequest, Refiner, ScoreSource,
};
pub use report::{pct_to_hue, AssessmentReport, Benchmark, RiskBand, SecurityLevel};
pub use router::{assessment_router, AssessmentState};
pub use scoring::{ScoreResult, ScoringConfig, ScoringConfigError, ScoringEngine};
pub use session::{QuizSession, SessionError, SessionStep};
pub use shuffle::{shuffle_questions, shuffle_questions_thread_rng};
