//! Descriptive statistics over a response collection, independent of scoring.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::survey::{SurveyResponse, SurveySchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatistics {
    pub total_responses: usize,
    pub completed_responses: usize,
    pub completion_rate: f64,
    pub average_completion_time_ms: f64,
    pub stakeholder_breakdown: BTreeMap<String, StakeholderStatistics>,
    pub domain_coverage: BTreeMap<String, DomainCoverage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderStatistics {
    pub total_responses: usize,
    pub completed_responses: usize,
    pub completion_rate: f64,
    pub unique_organizations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCoverage {
    pub question_count: usize,
    pub total_answers: usize,
    pub possible_answers: usize,
    pub coverage_rate: f64,
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn compute_statistics(
    schema: &SurveySchema,
    responses: &[SurveyResponse],
) -> ResponseStatistics {
    let completed: Vec<&SurveyResponse> = responses
        .iter()
        .filter(|response| response.is_complete())
        .collect();

    let durations: Vec<i64> = completed
        .iter()
        .filter_map(|response| response.completion_duration_ms())
        .collect();
    let average_completion_time_ms = if durations.is_empty() {
        0.0
    } else {
        durations.iter().map(|ms| *ms as f64).sum::<f64>() / durations.len() as f64
    };

    ResponseStatistics {
        total_responses: responses.len(),
        completed_responses: completed.len(),
        completion_rate: percentage(completed.len(), responses.len()),
        average_completion_time_ms,
        stakeholder_breakdown: stakeholder_breakdown(schema, responses),
        domain_coverage: domain_coverage(schema, &completed),
    }
}

fn stakeholder_breakdown(
    schema: &SurveySchema,
    responses: &[SurveyResponse],
) -> BTreeMap<String, StakeholderStatistics> {
    let mut organizations: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut breakdown: BTreeMap<String, StakeholderStatistics> = schema
        .stakeholders
        .iter()
        .map(|stakeholder| (stakeholder.id.clone(), StakeholderStatistics::default()))
        .collect();

    for response in responses {
        let entry = breakdown.entry(response.stakeholder.clone()).or_default();
        entry.total_responses += 1;
        if response.is_complete() {
            entry.completed_responses += 1;
        }
        organizations
            .entry(response.stakeholder.as_str())
            .or_default()
            .insert(response.organization_id.as_str());
    }

    for (stakeholder, stats) in breakdown.iter_mut() {
        stats.completion_rate = percentage(stats.completed_responses, stats.total_responses);
        stats.unique_organizations = organizations
            .get(stakeholder.as_str())
            .map(BTreeSet::len)
            .unwrap_or(0);
    }

    breakdown
}

fn domain_coverage(
    schema: &SurveySchema,
    completed: &[&SurveyResponse],
) -> BTreeMap<String, DomainCoverage> {
    schema
        .domains
        .iter()
        .map(|domain| {
            let question_count = schema
                .questions
                .iter()
                .filter(|question| question.domain == domain.id)
                .count();

            let mut coverage = DomainCoverage {
                question_count,
                ..DomainCoverage::default()
            };

            for response in completed {
                for question in schema.domain_questions_for(&domain.id, &response.stakeholder) {
                    coverage.possible_answers += 1;
                    if response.answer(&question.id).is_some() {
                        coverage.total_answers += 1;
                    }
                }
            }

            coverage.coverage_rate = percentage(coverage.total_answers, coverage.possible_answers);
            (domain.id.clone(), coverage)
        })
        .collect()
}
