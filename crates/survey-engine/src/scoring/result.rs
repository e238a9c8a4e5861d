use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::survey::MaturityLevel;

/// Computed outcome of scoring a survey; recomputed on demand, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResult {
    pub survey_id: String,
    pub organization_id: String,
    pub overall_score: f64,
    pub domain_scores: BTreeMap<String, f64>,
    /// Weighted contribution of each stakeholder role, keyed by domain then stakeholder.
    pub stakeholder_contributions: BTreeMap<String, BTreeMap<String, f64>>,
    pub maturity_level: Option<MaturityLevel>,
    pub recommendations: Vec<String>,
    pub response_count: usize,
    pub stakeholder_breakdown: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
}

impl SurveyResult {
    /// A zero score only means "low maturity" when something was actually scored.
    pub fn has_data(&self) -> bool {
        self.response_count > 0
    }
}

/// Flat row used for tabular exports of domain scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScoreRow {
    pub domain_id: String,
    pub domain_name: String,
    pub weight: f64,
    pub score: f64,
    pub contributing_stakeholders: usize,
}
