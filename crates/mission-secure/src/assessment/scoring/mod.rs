mod config;
mod recommendations;
mod rules;

pub use config::{
    CategoryWeights, MaturityBonusConfig, RiskProfile, RiskRating, ScoringConfig,
    ScoringConfigError,
};
pub use recommendations::{
    recommend, RiskLevel, BALANCE_RECOMMENDATION, COMPLIANCE_ROADMAP, CRITICAL_GAP_MARKER,
    IMMEDIATE_ACTION, IMPROVEMENT_MARKER, STRATEGIC_PRIORITY, THIRTY_DAY_GOAL,
};
pub use rules::CategoryScores;

use super::domain::{AnswerMap, Question};
use serde::{Deserialize, Serialize};

/// Stateless scorer applying a [`ScoringConfig`] to a completed answer set.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, answers: &AnswerMap, questions: &[Question]) -> ScoreResult {
        let category_scores = rules::categorize(answers, questions);
        let base_percent = rules::weighted_percent(&category_scores, &self.config.category_weights);

        let perfect_answers = rules::count_perfect(answers, questions);
        let maturity_bonus = self.config.maturity.bonus_for(perfect_answers);
        let percent = base_percent.saturating_add(maturity_bonus).min(100);

        let notes = recommend(answers, questions, &category_scores, &self.config);

        tracing::debug!(
            answered = category_scores.answered(),
            base_percent,
            perfect_answers,
            maturity_bonus,
            percent,
            notes = notes.len(),
            "scored assessment"
        );

        ScoreResult {
            percent,
            notes,
            category_scores,
            maturity_bonus,
        }
    }
}

/// Score with the built-in constants.
pub fn score(answers: &AnswerMap, questions: &[Question]) -> ScoreResult {
    ScoringEngine::default().score(answers, questions)
}

/// Local, deterministic outcome of one completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub percent: u8,
    pub notes: Vec<String>,
    pub category_scores: CategoryScores,
    pub maturity_bonus: u8,
}
