use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::Category;
use super::refinement::{RefinedScore, ScoreSource};
use super::scoring::{CategoryScores, ScoreResult};

/// Map a 0..=100 score onto an HSL hue between red (0) and green (120).
pub fn pct_to_hue(percent: f64) -> u16 {
    ((percent.clamp(0.0, 100.0) / 100.0) * 120.0).round() as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Developing,
}

impl SecurityLevel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            95.. => Self::Platinum,
            85..=94 => Self::Gold,
            70..=84 => Self::Silver,
            50..=69 => Self::Bronze,
            _ => Self::Developing,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Platinum => "Platinum - Cybersecurity Excellence",
            Self::Gold => "Gold - Advanced Security",
            Self::Silver => "Silver - Good Security Practices",
            Self::Bronze => "Bronze - Basic Security Foundation",
            Self::Developing => "Developing - Needs Attention",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::Platinum => "💎",
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
            Self::Developing => "🔧",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub const fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::Low,
            70..=84 => Self::Moderate,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    pub const fn remediation_window(self) -> &'static str {
        match self {
            Self::Low => "30 days",
            Self::Moderate => "60 days",
            Self::High => "90 days",
        }
    }

    pub const fn investment(self) -> &'static str {
        match self {
            Self::Low => "$500-2K",
            Self::Moderate => "$2K-8K",
            Self::High => "$8K-20K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Benchmark {
    TopTenPercent,
    AboveAverage,
    BelowAverage,
}

impl Benchmark {
    pub const fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::TopTenPercent,
            67..=84 => Self::AboveAverage,
            _ => Self::BelowAverage,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TopTenPercent => "Top 10%",
            Self::AboveAverage => "Above Average",
            Self::BelowAverage => "Below Average",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownEntry {
    pub category: Category,
    pub label: &'static str,
    pub average_percent: u8,
    pub answered: usize,
}

/// Everything the results screen shows for a finished assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub score: u8,
    pub notes: Vec<String>,
    pub hue: u16,
    pub security_level: SecurityLevel,
    pub security_level_label: &'static str,
    pub badge: &'static str,
    pub risk_band: RiskBand,
    pub risk_band_label: &'static str,
    pub remediation_window: &'static str,
    pub estimated_investment: &'static str,
    pub benchmark: &'static str,
    pub category_breakdown: Vec<CategoryBreakdownEntry>,
    pub category_scores: CategoryScores,
    pub maturity_bonus: u8,
    pub refined: bool,
    pub celebrate: bool,
    pub assessed_at: DateTime<Utc>,
}

impl AssessmentReport {
    pub fn build(local: &ScoreResult, final_score: RefinedScore, assessed_at: DateTime<Utc>) -> Self {
        let RefinedScore {
            score,
            notes,
            source,
        } = final_score;
        let level = SecurityLevel::from_score(score);
        let band = RiskBand::from_score(score);

        let category_breakdown = Category::ALL
            .iter()
            .map(|category| {
                let answered = local.category_scores.weights(*category).len();
                CategoryBreakdownEntry {
                    category: *category,
                    label: category.label(),
                    average_percent: (local.category_scores.average(*category) * 100.0).round()
                        as u8,
                    answered,
                }
            })
            .collect();

        Self {
            score,
            notes,
            hue: pct_to_hue(f64::from(score)),
            security_level: level,
            security_level_label: level.label(),
            badge: level.badge(),
            risk_band: band,
            risk_band_label: band.label(),
            remediation_window: band.remediation_window(),
            estimated_investment: band.investment(),
            benchmark: Benchmark::from_score(score).label(),
            category_breakdown,
            category_scores: local.category_scores.clone(),
            maturity_bonus: local.maturity_bonus,
            refined: source == ScoreSource::Remote,
            celebrate: score >= 85,
            assessed_at,
        }
    }

    /// Report from the local score alone.
    pub fn local(local: &ScoreResult, assessed_at: DateTime<Utc>) -> Self {
        Self::build(local, RefinedScore::from_local(local), assessed_at)
    }
}
