//! Survey data model plus the respondent-facing rules: question selection,
//! conditional visibility, answer validation, and schema integrity checks.

pub mod filter;
pub mod integrity;
pub mod response;
pub mod schema;
pub mod validation;
pub mod visibility;

#[cfg(test)]
pub(crate) mod tests;

pub use filter::select_questions;
pub use integrity::{check_integrity, IntegrityError, IntegrityIssue};
pub use response::{numeric_value, SurveyResponse};
pub use schema::{
    Answer, Comparator, ConditionalRule, Domain, MaturityLevel, Question, QuestionOption,
    QuestionType, ScoringConfig, ScoringMethod, Stakeholder, SurveySchema, ValidationRules,
};
pub use validation::{validate_answer, validate_response, ValidationResult};
pub use visibility::is_visible;
