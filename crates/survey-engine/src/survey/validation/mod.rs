mod rules;

pub use rules::validate_answer;

use serde::{Deserialize, Serialize};

use super::filter::select_questions;
use super::response::{is_blank, SurveyResponse};
use super::schema::SurveySchema;
use super::visibility::is_visible;

/// Accumulated outcome of checking answers; warnings never block completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.errors.is_empty();
    }
}

/// Check a submission against the questions addressed to its respondent.
///
/// Visible required questions must be answered, and every answer that maps to a
/// schema question must satisfy that question's type contract.
pub fn validate_response(schema: &SurveySchema, response: &SurveyResponse) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let assigned = select_questions(schema, &response.stakeholder, &response.expertise);

    for question in &assigned {
        if !question.is_required() || !is_visible(question, &response.responses) {
            continue;
        }
        if is_blank(response.responses.get(&question.id)) {
            result.error(format!("Question '{}' is required", question.id));
        }
    }

    for (question_id, answer) in &response.responses {
        if answer.is_null() {
            continue;
        }
        let Some(question) = schema.question(question_id) else {
            result.warning(format!(
                "Answer provided for unknown question '{question_id}'"
            ));
            continue;
        };
        if !assigned
            .iter()
            .any(|candidate| candidate.id == question.id)
        {
            result.warning(format!(
                "Question '{question_id}' is not addressed to stakeholder '{}'",
                response.stakeholder
            ));
        }
        result.merge(validate_answer(question, answer));
    }

    result
}
