use regex::Regex;
use serde_json::Value;

use super::ValidationResult;
use crate::survey::response::numeric_value;
use crate::survey::schema::{Answer, Question, QuestionType};

/// Check a single answer against its question's type contract.
pub fn validate_answer(question: &Question, answer: &Answer) -> ValidationResult {
    let mut result = ValidationResult::valid();

    match question.kind {
        QuestionType::Likert5 | QuestionType::Likert3 => check_likert(question, answer, &mut result),
        QuestionType::MultipleChoice => check_multiple_choice(question, answer, &mut result),
        QuestionType::SingleSelect => check_single_select(question, answer, &mut result),
        QuestionType::Text => check_text(question, answer, &mut result),
        QuestionType::Number => check_number(question, answer, &mut result),
        QuestionType::Boolean => {
            if !answer.is_boolean() {
                result.error(format!(
                    "Answer must be true or false (question '{}')",
                    question.id
                ));
            }
        }
    }

    result
}

fn check_likert(question: &Question, answer: &Answer, result: &mut ValidationResult) {
    let Some((min, max)) = question.kind.likert_bounds() else {
        return;
    };

    let within = match answer {
        Value::Number(number) => match number.as_i64() {
            Some(value) => (min..=max).contains(&value),
            None => number
                .as_f64()
                .filter(|value| value.fract() == 0.0)
                .map(|value| value >= min as f64 && value <= max as f64)
                .unwrap_or(false),
        },
        _ => false,
    };

    if !within {
        result.error(format!(
            "Answer must be between {min} and {max} (question '{}', got {answer})",
            question.id
        ));
    }
}

fn check_multiple_choice(question: &Question, answer: &Answer, result: &mut ValidationResult) {
    let Some(selected) = answer.as_array() else {
        result.error(format!(
            "Answer must be a list of options (question '{}')",
            question.id
        ));
        return;
    };

    if selected.is_empty() {
        result.error(format!(
            "Select at least one option (question '{}')",
            question.id
        ));
    }

    for value in selected {
        if !question.has_option(value) {
            result.error(format!(
                "{value} is not a valid option (question '{}')",
                question.id
            ));
        }
    }
}

fn check_single_select(question: &Question, answer: &Answer, result: &mut ValidationResult) {
    if answer.is_null() || answer.is_array() {
        result.error(format!(
            "Select exactly one option (question '{}')",
            question.id
        ));
        return;
    }

    if !question.has_option(answer) {
        result.error(format!(
            "{answer} is not a valid option (question '{}')",
            question.id
        ));
    }
}

fn check_text(question: &Question, answer: &Answer, result: &mut ValidationResult) {
    let Some(text) = answer.as_str() else {
        result.error(format!("Answer must be text (question '{}')", question.id));
        return;
    };

    let Some(rules) = &question.validation else {
        return;
    };

    let length = text.chars().count();
    if let Some(min_length) = rules.min_length {
        if length < min_length {
            result.error(format!(
                "Answer must be at least {min_length} characters (question '{}')",
                question.id
            ));
        }
    }
    if let Some(max_length) = rules.max_length {
        if length > max_length {
            result.error(format!(
                "Answer must be at most {max_length} characters (question '{}')",
                question.id
            ));
        }
    }

    if let Some(pattern) = &rules.pattern {
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => {
                if !regex.is_match(text) {
                    result.error(format!(
                        "Answer does not match the expected format (question '{}')",
                        question.id
                    ));
                }
            }
            Err(err) => result.warning(format!(
                "Validation pattern for question '{}' could not be compiled: {err}",
                question.id
            )),
        }
    }
}

fn check_number(question: &Question, answer: &Answer, result: &mut ValidationResult) {
    let numeric = match answer {
        Value::Number(_) | Value::String(_) => numeric_value(answer),
        _ => None,
    };

    let Some(value) = numeric else {
        result.error(format!(
            "Answer must be a number (question '{}')",
            question.id
        ));
        return;
    };

    let Some(rules) = &question.validation else {
        return;
    };

    if let Some(min) = rules.min {
        if value < min {
            result.error(format!(
                "Answer must be at least {min} (question '{}')",
                question.id
            ));
        }
    }
    if let Some(max) = rules.max {
        if value > max {
            result.error(format!(
                "Answer must be at most {max} (question '{}')",
                question.id
            ));
        }
    }
}
