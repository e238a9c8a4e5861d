use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::maturity::{classify, recommendations};
use super::result::SurveyResult;
use crate::config::{EngineConfig, StakeholderAggregation};
use crate::survey::{numeric_value, Question, SurveyResponse, SurveySchema};

/// Nested weighted average: within a role per domain, across roles per domain, across domains.
pub(crate) fn score(
    schema: &SurveySchema,
    responses: &[SurveyResponse],
    config: &EngineConfig,
) -> SurveyResult {
    warn_on_undeclared_stakeholders(schema, responses);

    let mut domain_scores = BTreeMap::new();
    let mut stakeholder_contributions = BTreeMap::new();

    for domain in &schema.domains {
        let mut contributions = BTreeMap::new();
        let mut contributed_weight = 0.0;

        for stakeholder in &schema.stakeholders {
            let weight = schema.stakeholder_weight(&stakeholder.id);
            if weight == 0.0 {
                continue;
            }

            let questions: Vec<&Question> = schema
                .domain_questions_for(&domain.id, &stakeholder.id)
                .collect();
            if questions.is_empty() {
                continue;
            }

            let per_response = responses
                .iter()
                .filter(|response| response.stakeholder == stakeholder.id)
                .filter_map(|response| response_average(response, &questions));

            if let Some(role_average) = fold_role(per_response, config.stakeholder_aggregation) {
                contributions.insert(stakeholder.id.clone(), role_average * weight);
                contributed_weight += weight;
            }
        }

        let contributed: f64 = contributions.values().sum();
        let domain_score = if contributed_weight == 0.0 {
            0.0
        } else {
            contributed / contributed_weight
        };

        debug!(
            domain = %domain.id,
            score = domain_score,
            stakeholders = contributions.len(),
            "scored domain"
        );

        domain_scores.insert(domain.id.clone(), domain_score);
        stakeholder_contributions.insert(domain.id.clone(), contributions);
    }

    let (weighted_total, weight_total) =
        schema
            .domains
            .iter()
            .fold((0.0, 0.0), |(total, weights), domain| {
                let weight = schema.domain_weight(&domain.id);
                let score = domain_scores.get(&domain.id).copied().unwrap_or(0.0);
                (total + score * weight, weights + weight)
            });
    let overall_score = if weight_total == 0.0 {
        0.0
    } else {
        weighted_total / weight_total
    };

    let maturity_level = classify(&schema.scoring.maturity_levels, overall_score).cloned();
    let recommendations = recommendations(
        schema,
        maturity_level.as_ref(),
        |domain_id| domain_scores.get(domain_id).copied().unwrap_or(0.0),
        config.low_score_threshold,
    );

    SurveyResult {
        survey_id: schema.id.clone(),
        organization_id: responses
            .first()
            .map(|response| response.organization_id.clone())
            .unwrap_or_default(),
        overall_score,
        domain_scores,
        stakeholder_contributions,
        maturity_level,
        recommendations,
        response_count: responses.len(),
        stakeholder_breakdown: stakeholder_breakdown(responses),
        completion_date: responses
            .iter()
            .filter_map(|response| response.completion_time)
            .max(),
    }
}

/// Mean of the numeric answers a response gives to the listed questions.
fn response_average(response: &SurveyResponse, questions: &[&Question]) -> Option<f64> {
    let (sum, count) = questions
        .iter()
        .filter_map(|question| response.answer(&question.id).and_then(numeric_value))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn fold_role(
    averages: impl Iterator<Item = f64>,
    aggregation: StakeholderAggregation,
) -> Option<f64> {
    match aggregation {
        StakeholderAggregation::LastResponse => averages.last(),
        StakeholderAggregation::MeanOfResponses => {
            let (sum, count) = averages.fold((0.0, 0usize), |(sum, count), value| {
                (sum + value, count + 1)
            });
            (count > 0).then(|| sum / count as f64)
        }
    }
}

pub(crate) fn stakeholder_breakdown(responses: &[SurveyResponse]) -> BTreeMap<String, usize> {
    let mut breakdown = BTreeMap::new();
    for response in responses {
        *breakdown.entry(response.stakeholder.clone()).or_insert(0) += 1;
    }
    breakdown
}

fn warn_on_undeclared_stakeholders(schema: &SurveySchema, responses: &[SurveyResponse]) {
    let undeclared: BTreeSet<&str> = responses
        .iter()
        .map(|response| response.stakeholder.as_str())
        .filter(|stakeholder| schema.stakeholder(stakeholder).is_none())
        .collect();

    for stakeholder in undeclared {
        warn!(
            survey = %schema.id,
            stakeholder,
            "responses from undeclared stakeholder contribute nothing to scores"
        );
    }
}
