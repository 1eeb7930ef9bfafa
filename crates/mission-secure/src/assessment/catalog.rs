use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::domain::{AnswerOption, AnswerWeight, Category, PostureSignal, Question, QuestionId};

/// Identifier recorded alongside logged responses for this catalog revision.
pub const QUIZ_ID: &str = "mission-secure-v1";

/// Validated, read-only question set.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id.clone()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }

            for weight in AnswerWeight::ALL {
                let count = question
                    .options
                    .iter()
                    .filter(|option| option.weight == weight)
                    .count();
                if count != 1 {
                    return Err(CatalogError::OptionWeights {
                        question_id: question.id.clone(),
                        weight: weight.value(),
                        count,
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    /// The ten-question Mission Secure assessment.
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id.as_str() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|question| &question.id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Process-wide standard catalog, built on first use.
pub fn standard_catalog() -> &'static QuestionCatalog {
    static CATALOG: OnceLock<QuestionCatalog> = OnceLock::new();
    CATALOG.get_or_init(QuestionCatalog::standard)
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one question")]
    Empty,
    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question {question_id} must have exactly one option per weight (weight {weight}: {count})")]
    OptionWeights {
        question_id: QuestionId,
        weight: f64,
        count: usize,
    },
}

fn question(
    id: &str,
    text: &str,
    category: Category,
    signal: Option<PostureSignal>,
    [bad, iffy, best]: [&str; 3],
    note_bad: &str,
    note_iffy: &str,
) -> Question {
    Question {
        id: QuestionId::from(id),
        text: text.to_string(),
        category,
        signal,
        options: vec![
            AnswerOption::new(bad, AnswerWeight::Bad),
            AnswerOption::new(iffy, AnswerWeight::Iffy),
            AnswerOption::new(best, AnswerWeight::Best),
        ],
        note_bad: note_bad.to_string(),
        note_iffy: note_iffy.to_string(),
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        question(
            "q1",
            "How does your organization secure user authentication? (Examples: Strong passwords, multi-factor authentication, password managers)",
            Category::Foundation,
            Some(PostureSignal::Authentication),
            [
                "Basic passwords only, no additional security measures",
                "Strong password requirements OR multi-factor authentication (but not both)",
                "Both strong password policies AND multi-factor authentication enforced",
            ],
            "Implement both strong password requirements and multi-factor authentication.",
            "Great start! Add the missing piece - either MFA or stronger password policies.",
        ),
        question(
            "q2",
            "Does your company enforce procedures that limit access to sensitive data and systems to designated staff with appropriate clearance? (Examples: Role-based access, approval workflows)",
            Category::Culture,
            None,
            [
                "No, we don't have any such procedures",
                "Some procedures exist but are not enforced",
                "Always enforced for all systems",
            ],
            "Implement access controls based on roles and responsibilities.",
            "Good start but consider enforcing it across all systems.",
        ),
        question(
            "q3",
            "Does your organization maintain a written policy that outlines how personal and customer data is collected, used, shared, and protected?",
            Category::Foundation,
            Some(PostureSignal::PrivacyPolicy),
            [
                "No policy exists",
                "Draft exists but not enforced",
                "Written, shared with staff/customers, and regularly reviewed",
            ],
            "Create a privacy policy that covers data collection and usage.",
            "Add scheduled reviews of the policy.",
        ),
        question(
            "q4",
            "Does your organization have a documented plan detailing how it will respond to a cyberattack or data breach? (Examples: Containment procedures, notification protocols, recovery plans)",
            Category::Culture,
            None,
            [
                "No plan exists",
                "Draft exists but not enforced",
                "Written, shared with staff/customers and they are trained regularly",
            ],
            "Write a simple incident response plan.",
            "Publish the plan and train staff.",
        ),
        question(
            "q5",
            "Does your organization have a strategy to maintain operations in the event of a cyber incident? (Examples: Remote work policies, data backups, failover systems)",
            Category::Culture,
            None,
            [
                "We are supposed to have one?",
                "Kinda we have some stuff",
                "Yes we do have a plan and everyone is aware of it and trained on it",
            ],
            "Create a simple business continuity plan.",
            "Practice the plan with all staff.",
        ),
        question(
            "q6",
            "How well are your organization's devices (laptops, phones, tablets) secured and maintained? (Examples: Encryption, antivirus/EDR, automatic updates, remote wipe capability)",
            Category::Advanced,
            None,
            [
                "Minimal security - basic antivirus only",
                "Some security measures but inconsistently applied",
                "Comprehensive security: encryption, EDR/antivirus, auto-updates, and device management",
            ],
            "Implement device encryption, endpoint protection, and automatic updates.",
            "Ensure all security measures are consistently applied across all devices.",
        ),
        question(
            "q7",
            "If your organization has an office space, are there safeguards to ensure only authorized personnel can access servers, network equipment, and/or sensitive files?",
            Category::Advanced,
            None,
            [
                "No physical security measures in place",
                "Basic measures like locked doors but no access tracking",
                "Comprehensive physical security with controlled access and logging",
            ],
            "Implement physical access controls for sensitive areas and equipment.",
            "Add access logging and regular security audits.",
        ),
        question(
            "q8",
            "Do employees receive regular cybersecurity training (at least annually) on phishing, safe internet use, and handling sensitive information?",
            Category::Foundation,
            None,
            [
                "No formal cybersecurity training provided",
                "Occasional reminders or basic awareness materials",
                "Regular annual training plus ongoing phishing simulations and updates",
            ],
            "Implement annual cybersecurity training covering phishing, data handling, and safe practices.",
            "Add hands-on phishing simulations and regular security updates.",
        ),
        question(
            "q9",
            "Is your organization familiar with federal cybersecurity standards and frameworks? (Examples: NIST SP 800-171, CISA guidance, Department of Defense requirements)",
            Category::Advanced,
            Some(PostureSignal::ComplianceAwareness),
            [
                "No awareness of federal cybersecurity standards",
                "Some awareness but no formal compliance efforts",
                "Actively following and implementing relevant federal standards",
            ],
            "Research applicable federal cybersecurity standards for your industry and organization type.",
            "Develop a formal compliance plan and begin implementation of relevant standards.",
        ),
        question(
            "q10",
            "How are you feeling today about your organization's cybersecurity posture?",
            Category::Culture,
            None,
            [
                "Very concerned - major gaps identified",
                "Somewhat concerned - moderate gaps identified",
                "Feeling secure - no significant gaps identified",
            ],
            "Prioritize addressing major gaps in your cybersecurity posture.",
            "Continue monitoring and improving your cybersecurity measures.",
        ),
    ]
}
