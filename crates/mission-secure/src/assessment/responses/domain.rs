use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::domain::{AnswerTag, AnswerWeight};

/// Identifier assigned to a stored response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub String);

/// One answered question as posted by a quiz front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub session_id: String,
    pub quiz_id: String,
    pub question_id: String,
    pub option_label: String,
    pub option_tag: AnswerTag,
    pub weight: f64,
}

impl NewResponse {
    pub(crate) fn validate(&self) -> Result<AnswerWeight, ResponseValidationError> {
        for (field, value) in [
            ("sessionId", &self.session_id),
            ("quizId", &self.quiz_id),
            ("questionId", &self.question_id),
            ("optionLabel", &self.option_label),
        ] {
            if value.trim().is_empty() {
                return Err(ResponseValidationError::MissingField(field));
            }
        }

        let weight = AnswerWeight::from_value(self.weight)
            .ok_or(ResponseValidationError::InvalidWeight(self.weight))?;
        if weight.tag() != self.option_tag {
            return Err(ResponseValidationError::TagMismatch {
                tag: self.option_tag,
                weight: self.weight,
            });
        }
        Ok(weight)
    }
}

/// Stored response event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    pub id: ResponseId,
    pub session_id: String,
    pub quiz_id: String,
    pub question_id: String,
    pub option_label: String,
    pub option_tag: AnswerTag,
    pub weight: AnswerWeight,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("weight must be 0, 0.5, or 1 (got {0})")]
    InvalidWeight(f64),
    #[error("option tag '{}' does not match weight {weight}", tag.label())]
    TagMismatch { tag: AnswerTag, weight: f64 },
}

/// Option tally within one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionStats {
    pub label: String,
    pub tag: AnswerTag,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub total: usize,
    pub options: Vec<OptionStats>,
}

/// Aggregate view over every logged response for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub quiz_id: String,
    pub total_responses: usize,
    pub sessions: usize,
    pub questions: Vec<QuestionStats>,
}
