use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw answer captured for a single question. Interpretation depends on the question type.
pub type Answer = Value;

/// Immutable configuration of one survey instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySchema {
    pub id: String,
    pub name: String,
    pub version: String,
    pub stakeholders: Vec<Stakeholder>,
    pub domains: Vec<Domain>,
    pub questions: Vec<Question>,
    pub scoring: ScoringConfig,
}

impl SurveySchema {
    pub fn stakeholder(&self, id: &str) -> Option<&Stakeholder> {
        self.stakeholders
            .iter()
            .find(|stakeholder| stakeholder.id == id)
    }

    pub fn domain(&self, id: &str) -> Option<&Domain> {
        self.domains.iter().find(|domain| domain.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Scoring weight for a stakeholder role. Roles absent from the weight table score nothing.
    pub fn stakeholder_weight(&self, id: &str) -> f64 {
        self.scoring
            .stakeholder_weights
            .get(id)
            .copied()
            .unwrap_or(0.0)
    }

    /// Scoring weight for a domain. Domains absent from the weight table carry no weight.
    pub fn domain_weight(&self, id: &str) -> f64 {
        self.scoring.domain_weights.get(id).copied().unwrap_or(0.0)
    }

    /// Questions belonging to a domain that are addressed to a stakeholder, in schema order.
    pub fn domain_questions_for<'a>(
        &'a self,
        domain_id: &'a str,
        stakeholder_id: &'a str,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |question| {
            question.domain == domain_id && question.targets_stakeholder(stakeholder_id)
        })
    }
}

/// Respondent role with a scoring weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub required_expertise: Vec<String>,
}

/// Thematic grouping of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Supported answer taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "likert_5")]
    Likert5,
    #[serde(rename = "likert_3")]
    Likert3,
    #[serde(rename = "multiple_choice")]
    MultipleChoice,
    #[serde(rename = "single_select")]
    SingleSelect,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
}

impl QuestionType {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionType::Likert5 => "likert_5",
            QuestionType::Likert3 => "likert_3",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::SingleSelect => "single_select",
            QuestionType::Text => "text",
            QuestionType::Number => "number",
            QuestionType::Boolean => "boolean",
        }
    }

    /// Inclusive scale bounds for Likert questions.
    pub const fn likert_bounds(self) -> Option<(i64, i64)> {
        match self {
            QuestionType::Likert5 => Some((1, 5)),
            QuestionType::Likert3 => Some((1, 3)),
            _ => None,
        }
    }

    pub const fn requires_options(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::SingleSelect
        )
    }
}

/// One assessment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub domain: String,
    pub target_stakeholders: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_expertise: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalRule>,
}

impl Question {
    pub fn targets_stakeholder(&self, stakeholder_id: &str) -> bool {
        self.target_stakeholders
            .iter()
            .any(|target| target == stakeholder_id)
    }

    pub fn is_required(&self) -> bool {
        self.required
            || self
                .validation
                .as_ref()
                .and_then(|rules| rules.required)
                .unwrap_or(false)
    }

    pub fn has_option(&self, value: &Answer) -> bool {
        self.options.iter().any(|option| &option.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub value: Answer,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Extra constraints for text and number questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Dependency on another question's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub depends_on: String,
    pub condition: Comparator,
    pub value: Answer,
}

/// Comparator of a conditional rule. Unrecognised names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    #[serde(untagged)]
    Unknown(String),
}

/// Weighting and classification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub method: ScoringMethod,
    #[serde(default)]
    pub stakeholder_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub domain_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub maturity_levels: Vec<MaturityLevel>,
    /// Name of a pre-registered strategy, consulted when `method` is `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_scorer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    WeightedAverage,
    Custom,
    #[serde(untagged)]
    Unsupported(String),
}

impl ScoringMethod {
    pub fn label(&self) -> &str {
        match self {
            ScoringMethod::WeightedAverage => "weighted_average",
            ScoringMethod::Custom => "custom",
            ScoringMethod::Unsupported(name) => name,
        }
    }
}

/// Named band of overall scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaturityLevel {
    pub name: String,
    pub min_score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl MaturityLevel {
    pub fn contains(&self, score: f64) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}
