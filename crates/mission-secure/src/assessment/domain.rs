use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for catalog questions (e.g. `q1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Scoring weight attached to an answer option. Only 0, 0.5 and 1 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerWeight {
    Bad,
    Iffy,
    Best,
}

impl AnswerWeight {
    pub const ALL: [AnswerWeight; 3] = [AnswerWeight::Bad, AnswerWeight::Iffy, AnswerWeight::Best];

    pub const fn value(self) -> f64 {
        match self {
            Self::Bad => 0.0,
            Self::Iffy => 0.5,
            Self::Best => 1.0,
        }
    }

    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Self::Bad)
        } else if value == 0.5 {
            Some(Self::Iffy)
        } else if value == 1.0 {
            Some(Self::Best)
        } else {
            None
        }
    }

    pub const fn tag(self) -> AnswerTag {
        match self {
            Self::Bad => AnswerTag::Bad,
            Self::Iffy => AnswerTag::Iffy,
            Self::Best => AnswerTag::Best,
        }
    }
}

impl Serialize for AnswerWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for AnswerWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Self::from_value(raw).ok_or_else(|| {
            serde::de::Error::custom(format!("answer weight must be 0, 0.5, or 1 (got {raw})"))
        })
    }
}

/// Qualitative label shipped with each option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerTag {
    Bad,
    Iffy,
    Best,
}

impl AnswerTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bad => "bad",
            Self::Iffy => "iffy",
            Self::Best => "best",
        }
    }
}

/// Scoring bucket a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Foundation,
    Advanced,
    #[default]
    Culture,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Foundation, Category::Advanced, Category::Culture];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation Security",
            Self::Advanced => "Advanced Controls",
            Self::Culture => "Security Culture",
        }
    }
}

/// Marks the questions that the pattern-based recommendations inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureSignal {
    Authentication,
    PrivacyPolicy,
    ComplianceAwareness,
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub weight: AnswerWeight,
    pub tag: AnswerTag,
}

impl AnswerOption {
    pub fn new(label: impl Into<String>, weight: AnswerWeight) -> Self {
        Self {
            label: label.into(),
            weight,
            tag: weight.tag(),
        }
    }
}

/// Survey item with its options and remediation notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<PostureSignal>,
    pub options: Vec<AnswerOption>,
    pub note_bad: String,
    pub note_iffy: String,
}

impl Question {
    pub fn option_for(&self, weight: AnswerWeight) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.weight == weight)
    }

    /// Remediation text for a non-perfect answer; `None` for [`AnswerWeight::Best`].
    pub fn note_for(&self, weight: AnswerWeight) -> Option<&str> {
        match weight {
            AnswerWeight::Bad => Some(&self.note_bad),
            AnswerWeight::Iffy => Some(&self.note_iffy),
            AnswerWeight::Best => None,
        }
    }
}

/// Selected option per answered question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<QuestionId, AnswerOption>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, returning any answer it replaced.
    pub fn record(&mut self, question_id: QuestionId, option: AnswerOption) -> Option<AnswerOption> {
        self.0.insert(question_id, option)
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerOption> {
        self.0.get(question_id)
    }

    pub fn weight_of(&self, question_id: &str) -> Option<AnswerWeight> {
        self.get(question_id).map(|option| option.weight)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerOption)> {
        self.0.iter()
    }
}

impl FromIterator<(QuestionId, AnswerOption)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerOption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
