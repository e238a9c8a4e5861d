//! Scoring and aggregation engine for multi-stakeholder maturity surveys.
//!
//! The engine is pure computation over in-memory schemas and responses. Storage,
//! transport, and presentation belong to the caller; [`repository`] and
//! [`service`] describe the seams where those collaborators plug in.

pub mod config;
pub mod error;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod statistics;
pub mod survey;

pub use error::ScoringError;
pub use scoring::{compute_result, CustomScorer, ScoringEngine, SurveyResult};
pub use statistics::{compute_statistics, ResponseStatistics};
pub use survey::{
    check_integrity, is_visible, select_questions, validate_answer, validate_response, Question,
    SurveyResponse, SurveySchema, ValidationResult,
};

/// Questions addressed to a respondent; alias kept for callers using the platform's naming.
pub fn filter_questions_for_respondent<'a, S: AsRef<str>>(
    schema: &'a SurveySchema,
    stakeholder_id: &str,
    expertise: &[S],
) -> Vec<&'a Question> {
    select_questions(schema, stakeholder_id, expertise)
}
