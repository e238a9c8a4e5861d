use std::error::Error;

use super::result::SurveyResult;
use crate::survey::{SurveyResponse, SurveySchema};

pub type CustomScorerError = Box<dyn Error + Send + Sync>;

/// Typed scoring strategy registered on the engine ahead of time and selected by name
/// through `scoring.customScorer`.
pub trait CustomScorer: Send + Sync {
    fn score(
        &self,
        schema: &SurveySchema,
        responses: &[SurveyResponse],
    ) -> Result<SurveyResult, CustomScorerError>;
}

impl<F> CustomScorer for F
where
    F: Fn(&SurveySchema, &[SurveyResponse]) -> Result<SurveyResult, CustomScorerError>
        + Send
        + Sync,
{
    fn score(
        &self,
        schema: &SurveySchema,
        responses: &[SurveyResponse],
    ) -> Result<SurveyResult, CustomScorerError> {
        self(schema, responses)
    }
}
