use std::sync::Arc;

use chrono::Utc;

use super::domain::{AnswerMap, Question};
use super::refinement::{refine_or_fallback, RefinementRequest, Refiner};
use super::report::AssessmentReport;
use super::scoring::{ScoreResult, ScoringEngine};

/// Runs the full completion pipeline: local score, optional refinement, report.
#[derive(Clone)]
pub struct Assessor {
    engine: Arc<ScoringEngine>,
    refiner: Option<Arc<dyn Refiner>>,
}

impl Assessor {
    pub fn new(engine: ScoringEngine, refiner: Option<Arc<dyn Refiner>>) -> Self {
        Self {
            engine: Arc::new(engine),
            refiner,
        }
    }

    pub fn local_only(engine: ScoringEngine) -> Self {
        Self::new(engine, None)
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn refiner(&self) -> Option<&dyn Refiner> {
        self.refiner.as_deref()
    }

    pub fn score(&self, answers: &AnswerMap, questions: &[Question]) -> ScoreResult {
        self.engine.score(answers, questions)
    }

    pub async fn assess(&self, answers: &AnswerMap, questions: &[Question]) -> AssessmentReport {
        let local = self.score(answers, questions);
        let request = RefinementRequest::from_result(answers, &local);
        let refined = refine_or_fallback(self.refiner(), &request).await;
        AssessmentReport::build(&local, refined, Utc::now())
    }
}
