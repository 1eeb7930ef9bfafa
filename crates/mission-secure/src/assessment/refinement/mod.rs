//! Optional remote adjustment of the locally computed score.
//!
//! A [`Refiner`] returns whatever JSON the remote side produced; the merge
//! rules in [`merge_reply`] decide field by field what is kept. Any failure
//! collapses to the local result.

mod grade_client;
mod openai;

pub use grade_client::GradeServiceClient;
pub use openai::OpenAiRefiner;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::AnswerMap;
use super::scoring::ScoreResult;

/// Maximum number of notes accepted from a remote reply.
pub const MAX_REMOTE_NOTES: usize = 6;

/// Payload sent to a refinement backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementRequest {
    pub answers: Value,
    pub local_score: u8,
    pub local_notes: Vec<String>,
}

impl RefinementRequest {
    pub fn new(answers: &AnswerMap, local_score: u8, local_notes: Vec<String>) -> Self {
        Self {
            answers: serde_json::to_value(answers).unwrap_or(Value::Null),
            local_score,
            local_notes,
        }
    }

    pub fn from_result(answers: &AnswerMap, result: &ScoreResult) -> Self {
        Self::new(answers, result.percent, result.notes.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Local,
    Remote,
}

/// Final score and notes after the optional remote pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedScore {
    pub score: u8,
    pub notes: Vec<String>,
    #[serde(skip_serializing)]
    #[serde(default = "local_source")]
    pub source: ScoreSource,
}

fn local_source() -> ScoreSource {
    ScoreSource::Local
}

impl RefinedScore {
    pub fn local(score: u8, notes: Vec<String>) -> Self {
        Self {
            score,
            notes,
            source: ScoreSource::Local,
        }
    }

    pub fn from_local(result: &ScoreResult) -> Self {
        Self::local(result.percent, result.notes.clone())
    }
}

/// Remote text-generation backend able to second-guess a local score.
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(&self, request: &RefinementRequest) -> Result<Value, RefinementError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RefinementError {
    #[error("refinement credentials are not configured")]
    MissingCredentials,
    #[error("invalid refinement configuration: {0}")]
    Config(String),
    #[error("refinement transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("refinement service returned HTTP {status}")]
    Status { status: u16 },
    #[error("refinement reply was malformed: {0}")]
    Malformed(String),
}

/// Merge a remote reply over the local values.
///
/// `score` is taken only when it is a JSON number (rounded, clamped to
/// 0..=100); `notes` only when it is an array (strings kept, first six).
pub fn merge_reply(local_score: u8, local_notes: &[String], reply: &Value) -> RefinedScore {
    let remote_score = reply
        .get("score")
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite())
        .map(|score| score.round().clamp(0.0, 100.0) as u8);

    let remote_notes = reply.get("notes").and_then(Value::as_array).map(|notes| {
        notes
            .iter()
            .filter_map(Value::as_str)
            .take(MAX_REMOTE_NOTES)
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    let source = if remote_score.is_some() || remote_notes.is_some() {
        ScoreSource::Remote
    } else {
        ScoreSource::Local
    };

    RefinedScore {
        score: remote_score.unwrap_or(local_score),
        notes: remote_notes.unwrap_or_else(|| local_notes.to_vec()),
        source,
    }
}

/// Ask the refiner (if any) and fall back to the local values on any failure.
pub async fn refine_or_fallback(
    refiner: Option<&dyn Refiner>,
    request: &RefinementRequest,
) -> RefinedScore {
    let Some(refiner) = refiner else {
        return RefinedScore::local(request.local_score, request.local_notes.clone());
    };

    match refiner.refine(request).await {
        Ok(reply) => {
            let refined = merge_reply(request.local_score, &request.local_notes, &reply);
            tracing::info!(
                local_score = request.local_score,
                score = refined.score,
                source = ?refined.source,
                "refinement reply merged"
            );
            refined
        }
        Err(err) => {
            tracing::warn!(error = %err, "refinement unavailable; keeping local score");
            RefinedScore::local(request.local_score, request.local_notes.clone())
        }
    }
}
