use super::config::{RiskProfile, RiskRating, ScoringConfig};
use super::rules::CategoryScores;
use crate::assessment::domain::{AnswerMap, AnswerWeight, Category, PostureSignal, Question};

pub const CRITICAL_GAP_MARKER: &str = "🚨";
pub const IMPROVEMENT_MARKER: &str = "📈";

pub const STRATEGIC_PRIORITY: &str = "🎯 STRATEGIC PRIORITY: Focus on cybersecurity fundamentals first - authentication, backups, and training form your security foundation. [Est. 60-90 days, $2000-8000 total investment]";
pub const BALANCE_RECOMMENDATION: &str = "⚖️ BALANCE RECOMMENDATION: Your advanced security exceeds your fundamentals. Strengthen your foundation for better overall protection. [30-day rebalancing focus]";
pub const COMPLIANCE_ROADMAP: &str = "🏛️ COMPLIANCE ROADMAP: Consider NIST Cybersecurity Framework adoption. Start with 'Identify' and 'Protect' functions. [90-day implementation, consider compliance consultant $5000-15000]";
pub const IMMEDIATE_ACTION: &str = "🔐 IMMEDIATE ACTION (Week 1): Deploy Microsoft Authenticator company-wide. Free solution, 2-hour setup per user. [ROI: Prevents 99.9% of automated attacks]";
pub const THIRTY_DAY_GOAL: &str = "💾 30-DAY GOAL: Implement 3-2-1 backup strategy. Recommended: Veeam + AWS S3 Glacier ($50-200/month). [Business continuity insurance against ransomware]";

/// Severity assigned to an unanswered-best question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
}

impl RiskLevel {
    pub fn classify(risk: &RiskProfile) -> Self {
        match (risk.impact, risk.likelihood) {
            (RiskRating::High, RiskRating::High) => Self::Critical,
            (RiskRating::High, _) | (_, RiskRating::High) => Self::High,
            _ => Self::Medium,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
        }
    }
}

struct Prioritized {
    priority: u16,
    text: String,
}

/// Build the ordered, risk-annotated action list for a completed answer set.
///
/// Critical gaps come first, then improvements (each sorted by urgency), then
/// the pattern-based notes. Nothing is produced when no catalog question was
/// answered.
pub fn recommend(
    answers: &AnswerMap,
    questions: &[Question],
    category_scores: &CategoryScores,
    config: &ScoringConfig,
) -> Vec<String> {
    let mut critical_gaps = Vec::new();
    let mut improvements = Vec::new();
    let mut answered_any = false;

    for question in questions {
        let Some(picked) = answers.get(question.id.as_str()) else {
            continue;
        };
        answered_any = true;
        let risk = config.risk_for(question.id.as_str());

        match picked.weight {
            AnswerWeight::Bad => {
                let level = RiskLevel::classify(risk);
                critical_gaps.push(Prioritized {
                    priority: u16::from(risk.urgency),
                    text: format!(
                        "{} [{} RISK • {} • 30-day target]",
                        question.note_bad,
                        level.label(),
                        risk.cost
                    ),
                });
            }
            AnswerWeight::Iffy => improvements.push(Prioritized {
                priority: u16::from(risk.urgency) + 2,
                text: format!(
                    "{} [MEDIUM RISK • {} • 60-day target]",
                    question.note_iffy, risk.cost
                ),
            }),
            AnswerWeight::Best => {}
        }
    }

    if !answered_any {
        return Vec::new();
    }

    critical_gaps.sort_by_key(|item| item.priority);
    improvements.sort_by_key(|item| item.priority);

    let strategic = pattern_notes(answers, questions, category_scores, config);

    critical_gaps
        .into_iter()
        .map(|item| format!("{CRITICAL_GAP_MARKER} {}", item.text))
        .chain(
            improvements
                .into_iter()
                .map(|item| format!("{IMPROVEMENT_MARKER} {}", item.text)),
        )
        .chain(strategic.into_iter().map(str::to_string))
        .take(config.max_recommendations)
        .collect()
}

fn pattern_notes(
    answers: &AnswerMap,
    questions: &[Question],
    category_scores: &CategoryScores,
    config: &ScoringConfig,
) -> Vec<&'static str> {
    let mut notes = Vec::new();
    let foundation_avg = category_scores.average(Category::Foundation);
    let advanced_avg = category_scores.average(Category::Advanced);

    if foundation_avg < config.foundation_priority_threshold {
        notes.push(STRATEGIC_PRIORITY);
    }

    if advanced_avg > foundation_avg + config.balance_margin {
        notes.push(BALANCE_RECOMMENDATION);
    }

    let below_best = |signal: PostureSignal| -> bool {
        questions
            .iter()
            .find(|question| question.signal == Some(signal))
            .map(|question| {
                answers
                    .weight_of(question.id.as_str())
                    .map(AnswerWeight::value)
                    .unwrap_or(0.0)
                    < 1.0
            })
            .unwrap_or(false)
    };

    if below_best(PostureSignal::ComplianceAwareness) {
        notes.push(COMPLIANCE_ROADMAP);
    }
    if below_best(PostureSignal::Authentication) {
        notes.push(IMMEDIATE_ACTION);
    }
    if below_best(PostureSignal::PrivacyPolicy) {
        notes.push(THIRTY_DAY_GOAL);
    }

    notes
}
