use serde::{Deserialize, Serialize};

use super::config::CategoryWeights;
use crate::assessment::domain::{AnswerMap, AnswerWeight, Category, Question};

/// Selected weights grouped by question category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub foundation: Vec<f64>,
    pub advanced: Vec<f64>,
    pub culture: Vec<f64>,
}

impl CategoryScores {
    pub fn weights(&self, category: Category) -> &[f64] {
        match category {
            Category::Foundation => &self.foundation,
            Category::Advanced => &self.advanced,
            Category::Culture => &self.culture,
        }
    }

    fn weights_mut(&mut self, category: Category) -> &mut Vec<f64> {
        match category {
            Category::Foundation => &mut self.foundation,
            Category::Advanced => &mut self.advanced,
            Category::Culture => &mut self.culture,
        }
    }

    /// Mean weight of a category, 0 when nothing in it was answered.
    pub fn average(&self, category: Category) -> f64 {
        let weights = self.weights(category);
        if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        }
    }

    pub fn answered(&self) -> usize {
        Category::ALL
            .iter()
            .map(|category| self.weights(*category).len())
            .sum()
    }
}

pub(crate) fn categorize(answers: &AnswerMap, questions: &[Question]) -> CategoryScores {
    let mut scores = CategoryScores::default();
    for question in questions {
        if let Some(picked) = answers.get(question.id.as_str()) {
            scores
                .weights_mut(question.category)
                .push(picked.weight.value());
        }
    }
    scores
}

/// Multiplier-weighted mean of all answered weights, as a rounded percentage.
///
/// Returns 0 when nothing was answered.
pub(crate) fn weighted_percent(scores: &CategoryScores, weights: &CategoryWeights) -> u8 {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for category in Category::ALL {
        let answered = scores.weights(category);
        if answered.is_empty() {
            continue;
        }
        let count = answered.len() as f64;
        let multiplier = weights.multiplier(category);
        total_score += scores.average(category) * multiplier * count;
        total_weight += multiplier * count;
    }

    if total_weight <= 0.0 {
        return 0;
    }

    ((total_score / total_weight) * 100.0).round().clamp(0.0, 100.0) as u8
}

pub(crate) fn count_perfect(answers: &AnswerMap, questions: &[Question]) -> usize {
    questions
        .iter()
        .filter(|question| answers.weight_of(question.id.as_str()) == Some(AnswerWeight::Best))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(foundation: &[f64], advanced: &[f64], culture: &[f64]) -> CategoryScores {
        CategoryScores {
            foundation: foundation.to_vec(),
            advanced: advanced.to_vec(),
            culture: culture.to_vec(),
        }
    }

    #[test]
    fn empty_scores_yield_zero_percent() {
        assert_eq!(weighted_percent(&CategoryScores::default(), &CategoryWeights::default()), 0);
    }

    #[test]
    fn larger_categories_weigh_proportionally() {
        // (1.0 * 1.2 * 1 + 0.0 * 0.8 * 4) / (1.2 + 3.2) = 0.2727...
        let breakdown = scores(&[1.0], &[], &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(weighted_percent(&breakdown, &CategoryWeights::default()), 27);
    }

    #[test]
    fn averages_default_to_zero() {
        let breakdown = scores(&[0.5, 1.0], &[], &[1.0]);
        assert_eq!(breakdown.average(Category::Foundation), 0.75);
        assert_eq!(breakdown.average(Category::Advanced), 0.0);
        assert_eq!(breakdown.answered(), 3);
    }
}
