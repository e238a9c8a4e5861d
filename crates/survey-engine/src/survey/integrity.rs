use std::collections::BTreeSet;
use std::fmt;

use super::schema::{MaturityLevel, SurveySchema};

/// A single structural inconsistency in a survey schema.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    DuplicateStakeholder(String),
    DuplicateDomain(String),
    DuplicateQuestion(String),
    UnknownDomain { question: String, domain: String },
    UnknownStakeholder { question: String, stakeholder: String },
    NoTargetStakeholders(String),
    MissingOptions(String),
    UnknownDependency { question: String, depends_on: String },
    UnknownWeightKey { table: &'static str, key: String },
    InvalidWeight { table: &'static str, key: String, weight: f64 },
    NoMaturityLevels,
    EmptyBand(String),
    OverlappingBands { lower: String, upper: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DuplicateStakeholder(id) => write!(f, "duplicate stakeholder id '{id}'"),
            IntegrityIssue::DuplicateDomain(id) => write!(f, "duplicate domain id '{id}'"),
            IntegrityIssue::DuplicateQuestion(id) => write!(f, "duplicate question id '{id}'"),
            IntegrityIssue::UnknownDomain { question, domain } => {
                write!(f, "question '{question}' references unknown domain '{domain}'")
            }
            IntegrityIssue::UnknownStakeholder {
                question,
                stakeholder,
            } => write!(
                f,
                "question '{question}' targets unknown stakeholder '{stakeholder}'"
            ),
            IntegrityIssue::NoTargetStakeholders(id) => {
                write!(f, "question '{id}' does not target any stakeholder")
            }
            IntegrityIssue::MissingOptions(id) => {
                write!(f, "choice question '{id}' declares no options")
            }
            IntegrityIssue::UnknownDependency {
                question,
                depends_on,
            } => write!(
                f,
                "question '{question}' depends on unknown question '{depends_on}'"
            ),
            IntegrityIssue::UnknownWeightKey { table, key } => {
                write!(f, "{table} weight declared for unknown id '{key}'")
            }
            IntegrityIssue::InvalidWeight { table, key, weight } => {
                write!(f, "{table} weight {weight} for '{key}' is outside 0..=1")
            }
            IntegrityIssue::NoMaturityLevels => write!(f, "no maturity levels declared"),
            IntegrityIssue::EmptyBand(name) => {
                write!(f, "maturity level '{name}' has minScore >= maxScore")
            }
            IntegrityIssue::OverlappingBands { lower, upper } => {
                write!(f, "maturity levels '{lower}' and '{upper}' overlap")
            }
        }
    }
}

/// Error returned when a schema fails ingestion checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("survey schema failed {} integrity check(s): {}", .issues.len(), render(.issues))]
pub struct IntegrityError {
    pub issues: Vec<IntegrityIssue>,
}

fn render(issues: &[IntegrityIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Verify the cross references and band layout the scoring engine relies on.
pub fn check_integrity(schema: &SurveySchema) -> Result<(), IntegrityError> {
    let mut issues = Vec::new();

    let stakeholders = unique_ids(
        schema.stakeholders.iter().map(|stakeholder| &stakeholder.id),
        IntegrityIssue::DuplicateStakeholder,
        &mut issues,
    );
    let domains = unique_ids(
        schema.domains.iter().map(|domain| &domain.id),
        IntegrityIssue::DuplicateDomain,
        &mut issues,
    );
    let questions = unique_ids(
        schema.questions.iter().map(|question| &question.id),
        IntegrityIssue::DuplicateQuestion,
        &mut issues,
    );

    for question in &schema.questions {
        if !domains.contains(question.domain.as_str()) {
            issues.push(IntegrityIssue::UnknownDomain {
                question: question.id.clone(),
                domain: question.domain.clone(),
            });
        }
        if question.target_stakeholders.is_empty() {
            issues.push(IntegrityIssue::NoTargetStakeholders(question.id.clone()));
        }
        for target in &question.target_stakeholders {
            if !stakeholders.contains(target.as_str()) {
                issues.push(IntegrityIssue::UnknownStakeholder {
                    question: question.id.clone(),
                    stakeholder: target.clone(),
                });
            }
        }
        if question.kind.requires_options() && question.options.is_empty() {
            issues.push(IntegrityIssue::MissingOptions(question.id.clone()));
        }
        if let Some(rule) = &question.conditional {
            if !questions.contains(rule.depends_on.as_str()) {
                issues.push(IntegrityIssue::UnknownDependency {
                    question: question.id.clone(),
                    depends_on: rule.depends_on.clone(),
                });
            }
        }
    }

    check_weights(
        "stakeholder",
        schema
            .scoring
            .stakeholder_weights
            .iter()
            .chain(schema.stakeholders.iter().map(|s| (&s.id, &s.weight))),
        &stakeholders,
        &mut issues,
    );
    check_weights(
        "domain",
        schema
            .scoring
            .domain_weights
            .iter()
            .chain(schema.domains.iter().map(|d| (&d.id, &d.weight))),
        &domains,
        &mut issues,
    );

    check_bands(&schema.scoring.maturity_levels, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError { issues })
    }
}

fn unique_ids<'a>(
    ids: impl Iterator<Item = &'a String>,
    duplicate: fn(String) -> IntegrityIssue,
    issues: &mut Vec<IntegrityIssue>,
) -> BTreeSet<&'a str> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            issues.push(duplicate(id.clone()));
        }
    }
    seen
}

fn check_weights<'a>(
    table: &'static str,
    weights: impl Iterator<Item = (&'a String, &'a f64)>,
    declared: &BTreeSet<&str>,
    issues: &mut Vec<IntegrityIssue>,
) {
    for (key, weight) in weights {
        if !declared.contains(key.as_str()) {
            issues.push(IntegrityIssue::UnknownWeightKey {
                table,
                key: key.clone(),
            });
        }
        if !(0.0..=1.0).contains(weight) {
            issues.push(IntegrityIssue::InvalidWeight {
                table,
                key: key.clone(),
                weight: *weight,
            });
        }
    }
}

fn check_bands(levels: &[MaturityLevel], issues: &mut Vec<IntegrityIssue>) {
    if levels.is_empty() {
        issues.push(IntegrityIssue::NoMaturityLevels);
        return;
    }

    for level in levels {
        if level.min_score >= level.max_score {
            issues.push(IntegrityIssue::EmptyBand(level.name.clone()));
        }
    }

    let mut sorted: Vec<&MaturityLevel> = levels.iter().collect();
    sorted.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));
    for pair in sorted.windows(2) {
        if pair[1].min_score <= pair[0].max_score {
            issues.push(IntegrityIssue::OverlappingBands {
                lower: pair[0].name.clone(),
                upper: pair[1].name.clone(),
            });
        }
    }
}
