use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assessment::domain::{Category, QuestionId};

/// Hand-tuned constants behind the score and the recommendations.
///
/// Everything here is data: deployments can replace it with a JSON profile
/// (see [`ScoringConfig::from_path`]) without touching the algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub category_weights: CategoryWeights,
    pub maturity: MaturityBonusConfig,
    pub risk_matrix: BTreeMap<QuestionId, RiskProfile>,
    pub default_risk: RiskProfile,
    pub max_recommendations: usize,
    /// Foundation average below which the strategic-priority note is added.
    pub foundation_priority_threshold: f64,
    /// Gap by which advanced may exceed foundation before the balance note fires.
    pub balance_margin: f64,
}

impl ScoringConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoringConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScoringConfigError> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn risk_for(&self, question_id: &str) -> &RiskProfile {
        self.risk_matrix.get(question_id).unwrap_or(&self.default_risk)
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        for category in Category::ALL {
            let multiplier = self.category_weights.multiplier(category);
            if !(multiplier.is_finite() && multiplier > 0.0) {
                return Err(ScoringConfigError::Invalid(format!(
                    "{} multiplier must be positive (got {multiplier})",
                    category.label()
                )));
            }
        }

        if self.maturity.minor_threshold > self.maturity.major_threshold {
            return Err(ScoringConfigError::Invalid(format!(
                "minor maturity threshold {} exceeds major threshold {}",
                self.maturity.minor_threshold, self.maturity.major_threshold
            )));
        }

        for (name, value) in [
            ("foundation_priority_threshold", self.foundation_priority_threshold),
            ("balance_margin", self.balance_margin),
        ] {
            if !value.is_finite() {
                return Err(ScoringConfigError::Invalid(format!(
                    "{name} must be a finite number (got {value})"
                )));
            }
        }

        if self.max_recommendations == 0 {
            return Err(ScoringConfigError::Invalid(
                "max_recommendations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weights: CategoryWeights::default(),
            maturity: MaturityBonusConfig::default(),
            risk_matrix: standard_risk_matrix(),
            default_risk: RiskProfile {
                impact: RiskRating::Medium,
                likelihood: RiskRating::Medium,
                urgency: 3,
                cost: "Variable".to_string(),
            },
            max_recommendations: 10,
            foundation_priority_threshold: 0.7,
            balance_margin: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub foundation: f64,
    pub advanced: f64,
    pub culture: f64,
}

impl CategoryWeights {
    pub const fn multiplier(&self, category: Category) -> f64 {
        match category {
            Category::Foundation => self.foundation,
            Category::Advanced => self.advanced,
            Category::Culture => self.culture,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            foundation: 1.2,
            advanced: 1.0,
            culture: 0.8,
        }
    }
}

/// Bonus points for organizations answering many questions perfectly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturityBonusConfig {
    pub major_threshold: usize,
    pub major_bonus: u8,
    pub minor_threshold: usize,
    pub minor_bonus: u8,
}

impl MaturityBonusConfig {
    pub const fn bonus_for(&self, perfect_answers: usize) -> u8 {
        if perfect_answers >= self.major_threshold {
            self.major_bonus
        } else if perfect_answers >= self.minor_threshold {
            self.minor_bonus
        } else {
            0
        }
    }
}

impl Default for MaturityBonusConfig {
    fn default() -> Self {
        Self {
            major_threshold: 8,
            major_bonus: 5,
            minor_threshold: 6,
            minor_bonus: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskRating {
    High,
    Medium,
    Low,
}

/// Impact/likelihood assessment and remediation estimate for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub impact: RiskRating,
    pub likelihood: RiskRating,
    /// 1 is the most urgent.
    pub urgency: u8,
    pub cost: String,
}

fn standard_risk_matrix() -> BTreeMap<QuestionId, RiskProfile> {
    use RiskRating::{High, Low, Medium};

    [
        ("q1", High, High, 1, "$100-500"),
        ("q2", Medium, High, 2, "$500-2000"),
        ("q3", High, Medium, 1, "$200-1000"),
        ("q4", Medium, Medium, 3, "$1000-5000"),
        ("q5", High, Low, 2, "$2000-10000"),
        ("q6", Medium, High, 2, "$500-3000"),
        ("q7", Medium, Low, 3, "$1000-5000"),
        ("q8", Medium, Medium, 2, "$2000-8000"),
        ("q9", Low, Low, 4, "$5000-15000"),
    ]
    .into_iter()
    .map(|(id, impact, likelihood, urgency, cost)| {
        (
            QuestionId::from(id),
            RiskProfile {
                impact,
                likelihood,
                urgency,
                cost: cost.to_string(),
            },
        )
    })
    .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unable to read scoring profile {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring profile is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoring profile rejected: {0}")]
    Invalid(String),
}
