use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::Answer;

/// One respondent's submission, treated as a value object by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub survey_id: String,
    pub organization_id: String,
    pub respondent_id: String,
    pub stakeholder: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub responses: BTreeMap<String, Answer>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: u8,
}

impl SurveyResponse {
    /// Fresh in-progress response for a respondent.
    pub fn begin(
        id: impl Into<String>,
        survey_id: impl Into<String>,
        organization_id: impl Into<String>,
        respondent_id: impl Into<String>,
        stakeholder: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            survey_id: survey_id.into(),
            organization_id: organization_id.into(),
            respondent_id: respondent_id.into(),
            stakeholder: stakeholder.into(),
            expertise: Vec::new(),
            responses: BTreeMap::new(),
            start_time,
            completion_time: None,
            progress: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Answer for a question, treating JSON null as unanswered.
    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.responses
            .get(question_id)
            .filter(|answer| !answer.is_null())
    }

    /// Elapsed time between start and completion, when both are known.
    pub fn completion_duration_ms(&self) -> Option<i64> {
        self.completion_time
            .map(|completed| (completed - self.start_time).num_milliseconds())
    }
}

/// Numeric reading of an answer used by scoring and numeric comparators.
///
/// Numbers map to themselves, booleans to 1/0, and strings when they parse to a
/// finite number. Everything else has no numeric value.
pub fn numeric_value(answer: &Answer) -> Option<f64> {
    match answer {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether an answer counts as missing for required-question checks.
pub fn is_blank(answer: Option<&Answer>) -> bool {
    match answer {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_value_coerces_scalars() {
        assert_eq!(numeric_value(&json!(4)), Some(4.0));
        assert_eq!(numeric_value(&json!(2.5)), Some(2.5));
        assert_eq!(numeric_value(&json!(" 3 ")), Some(3.0));
        assert_eq!(numeric_value(&json!(true)), Some(1.0));
        assert_eq!(numeric_value(&json!(false)), Some(0.0));
        assert_eq!(numeric_value(&json!("many")), None);
        assert_eq!(numeric_value(&json!("NaN")), None);
        assert_eq!(numeric_value(&json!(null)), None);
        assert_eq!(numeric_value(&json!([1])), None);
    }

    #[test]
    fn blank_answers_include_whitespace_and_empty_selection() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(null))));
        assert!(is_blank(Some(&json!("   "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!(0))));
    }

    #[test]
    fn deserializes_in_progress_response() {
        let response: SurveyResponse = serde_json::from_value(json!({
            "id": "r1",
            "surveyId": "s1",
            "organizationId": "org",
            "respondentId": "p1",
            "stakeholder": "mgr",
            "responses": {"q1": 4, "q2": null},
            "startTime": "2025-03-01T09:00:00Z"
        }))
        .expect("response deserializes");

        assert_eq!(response.progress, 0);
        assert!(!response.is_complete());
        assert_eq!(response.answer("q1"), Some(&json!(4)));
        assert_eq!(response.answer("q2"), None);
        assert_eq!(response.completion_duration_ms(), None);
    }
}
