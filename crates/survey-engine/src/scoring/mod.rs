//! Maturity scoring: nested weighted averages, band classification, and
//! pluggable custom strategies.

mod custom;
mod maturity;
mod result;
mod weighted;

#[cfg(test)]
mod tests;

pub use custom::{CustomScorer, CustomScorerError};
pub use maturity::classify;
pub use result::{DomainScoreRow, SurveyResult};

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ScoringError;
use crate::survey::{ScoringMethod, SurveyResponse, SurveySchema};

/// Stateless scorer; one instance can serve concurrent requests.
#[derive(Clone, Default)]
pub struct ScoringEngine {
    config: EngineConfig,
    scorers: BTreeMap<String, Arc<dyn CustomScorer>>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .field("scorers", &self.scorers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scorers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a strategy that schemas using the `custom` method can select by name.
    pub fn with_scorer(mut self, name: impl Into<String>, scorer: Arc<dyn CustomScorer>) -> Self {
        self.scorers.insert(name.into(), scorer);
        self
    }

    pub fn compute_result(
        &self,
        schema: &SurveySchema,
        responses: &[SurveyResponse],
    ) -> Result<SurveyResult, ScoringError> {
        debug!(
            survey = %schema.id,
            method = schema.scoring.method.label(),
            responses = responses.len(),
            "computing survey result"
        );

        match &schema.scoring.method {
            ScoringMethod::WeightedAverage => Ok(weighted::score(schema, responses, &self.config)),
            ScoringMethod::Custom => self.run_custom(schema, responses),
            ScoringMethod::Unsupported(name) => {
                Err(ScoringError::UnsupportedScoringMethod(name.clone()))
            }
        }
    }

    fn run_custom(
        &self,
        schema: &SurveySchema,
        responses: &[SurveyResponse],
    ) -> Result<SurveyResult, ScoringError> {
        let Some(name) = schema.scoring.custom_scorer.as_deref() else {
            return Err(ScoringError::CustomScoringExecution {
                scorer: String::new(),
                message: "schema selects the custom method without naming a scorer".to_string(),
            });
        };

        let scorer = self
            .scorers
            .get(name)
            .ok_or_else(|| ScoringError::CustomScoringExecution {
                scorer: name.to_string(),
                message: "no scorer registered under this name".to_string(),
            })?;

        scorer
            .score(schema, responses)
            .map_err(|err| ScoringError::CustomScoringExecution {
                scorer: name.to_string(),
                message: err.to_string(),
            })
    }
}

/// Score with the default engine configuration and no custom strategies.
pub fn compute_result(
    schema: &SurveySchema,
    responses: &[SurveyResponse],
) -> Result<SurveyResult, ScoringError> {
    ScoringEngine::default().compute_result(schema, responses)
}

/// Tabular view of a result's domain scores, in schema order.
pub fn domain_rows(schema: &SurveySchema, result: &SurveyResult) -> Vec<DomainScoreRow> {
    schema
        .domains
        .iter()
        .map(|domain| DomainScoreRow {
            domain_id: domain.id.clone(),
            domain_name: domain.name.clone(),
            weight: schema.domain_weight(&domain.id),
            score: result.domain_scores.get(&domain.id).copied().unwrap_or(0.0),
            contributing_stakeholders: result
                .stakeholder_contributions
                .get(&domain.id)
                .map(BTreeMap::len)
                .unwrap_or(0),
        })
        .collect()
}
