use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::response::numeric_value;
use super::schema::{Answer, Comparator, Question};

/// Whether a question is shown, given the answers collected so far.
///
/// Questions without a condition are always visible. A condition on an unanswered
/// question hides the dependent question. Unrecognised comparators leave it visible.
pub fn is_visible(question: &Question, responses: &BTreeMap<String, Answer>) -> bool {
    let Some(rule) = &question.conditional else {
        return true;
    };

    let Some(current) = responses
        .get(&rule.depends_on)
        .filter(|answer| !answer.is_null())
    else {
        return false;
    };

    match &rule.condition {
        Comparator::Equals => loosely_equal(current, &rule.value),
        Comparator::NotEquals => !loosely_equal(current, &rule.value),
        Comparator::GreaterThan => compare_numeric(current, &rule.value, |lhs, rhs| lhs > rhs),
        Comparator::LessThan => compare_numeric(current, &rule.value, |lhs, rhs| lhs < rhs),
        Comparator::Unknown(name) => {
            debug!(
                question = %question.id,
                comparator = %name,
                depends_on = %rule.depends_on,
                "unrecognised conditional comparator; treating question as visible"
            );
            true
        }
    }
}

fn compare_numeric(lhs: &Answer, rhs: &Answer, op: impl Fn(f64, f64) -> bool) -> bool {
    match (numeric_value(lhs), numeric_value(rhs)) {
        (Some(lhs), Some(rhs)) => op(lhs, rhs),
        _ => false,
    }
}

/// Equality that tolerates answers stored as strings versus numbers.
fn loosely_equal(lhs: &Answer, rhs: &Answer) -> bool {
    if lhs == rhs {
        return true;
    }

    match (lhs, rhs) {
        (Value::String(_), Value::Number(_)) | (Value::Number(_), Value::String(_)) => {
            matches!(
                (numeric_value(lhs), numeric_value(rhs)),
                (Some(left), Some(right)) if left == right
            )
        }
        (Value::String(text), Value::Bool(flag)) | (Value::Bool(flag), Value::String(text)) => {
            text.trim().eq_ignore_ascii_case(if *flag { "true" } else { "false" })
        }
        _ => false,
    }
}
