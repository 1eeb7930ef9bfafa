use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::assessor::Assessor;
use crate::assessment::catalog::standard_catalog;
use crate::assessment::domain::{AnswerMap, AnswerWeight, Question};
use crate::assessment::refinement::{RefinementError, RefinementRequest, Refiner};
use crate::assessment::router::{assessment_router, AssessmentState};
use crate::assessment::scoring::ScoringEngine;

/// Answer every catalog question with the weight `pick` chooses for it.
pub(super) fn answers_where(pick: impl Fn(&Question) -> Option<AnswerWeight>) -> AnswerMap {
    standard_catalog()
        .questions()
        .iter()
        .filter_map(|question| {
            let weight = pick(question)?;
            let option = question.option_for(weight).expect("catalog has every weight");
            Some((question.id.clone(), option.clone()))
        })
        .collect()
}

pub(super) fn answers_all(weight: AnswerWeight) -> AnswerMap {
    answers_where(|_| Some(weight))
}

/// The first `perfect` questions in catalog order answered best, the rest bad.
pub(super) fn answers_with_perfect(perfect: usize) -> AnswerMap {
    let order: Vec<_> = standard_catalog().ids().cloned().collect();
    answers_where(|question| {
        let position = order
            .iter()
            .position(|id| *id == question.id)
            .expect("question in catalog");
        Some(if position < perfect {
            AnswerWeight::Best
        } else {
            AnswerWeight::Bad
        })
    })
}

pub(super) fn answers_by_id(picks: &[(&str, AnswerWeight)]) -> AnswerMap {
    answers_where(|question| {
        picks
            .iter()
            .find(|(id, _)| *id == question.id.as_str())
            .map(|(_, weight)| *weight)
    })
}

pub(super) fn note_bad(id: &str) -> &'static str {
    &standard_catalog().get(id).expect("question exists").note_bad
}

pub(super) fn note_iffy(id: &str) -> &'static str {
    &standard_catalog().get(id).expect("question exists").note_iffy
}

pub(super) struct FixedRefiner(pub(super) Value);

#[async_trait]
impl Refiner for FixedRefiner {
    async fn refine(&self, _request: &RefinementRequest) -> Result<Value, RefinementError> {
        Ok(self.0.clone())
    }
}

pub(super) struct UnreachableRefiner;

#[async_trait]
impl Refiner for UnreachableRefiner {
    async fn refine(&self, _request: &RefinementRequest) -> Result<Value, RefinementError> {
        Err(RefinementError::Status { status: 502 })
    }
}

pub(super) fn assessment_app(refiner: Option<Arc<dyn Refiner>>) -> axum::Router {
    assessment_router(AssessmentState {
        assessor: Assessor::new(ScoringEngine::default(), refiner),
        catalog: standard_catalog(),
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
