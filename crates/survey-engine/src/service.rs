use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::ScoringError;
use crate::repository::{ProgressStore, RepositoryError, SurveyRepository};
use crate::scoring::{ScoringEngine, SurveyResult};
use crate::statistics::{compute_statistics, ResponseStatistics};
use crate::survey::response::is_blank;
use crate::survey::{
    check_integrity, is_visible, select_questions, validate_response, Answer, IntegrityError,
    Question, SurveyResponse, SurveySchema, ValidationResult,
};

/// Service composing storage, the progress cache, and the scoring engine.
pub struct SurveyService<R, P> {
    repository: Arc<R>,
    progress: Arc<P>,
    engine: Arc<ScoringEngine>,
}

/// Outcome of saving a partial set of answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub response: SurveyResponse,
    pub validation: ValidationResult,
    pub finalized: bool,
}

impl<R, P> SurveyService<R, P>
where
    R: SurveyRepository + 'static,
    P: ProgressStore + 'static,
{
    pub fn new(repository: Arc<R>, progress: Arc<P>, engine: Arc<ScoringEngine>) -> Self {
        Self {
            repository,
            progress,
            engine,
        }
    }

    /// Accept a schema after integrity checks.
    pub fn ingest_schema(&self, schema: SurveySchema) -> Result<(), ServiceError> {
        check_integrity(&schema)?;
        info!(survey = %schema.id, version = %schema.version, "schema ingested");
        self.repository.store_schema(schema)?;
        Ok(())
    }

    pub fn schema(&self, survey_id: &str) -> Result<SurveySchema, ServiceError> {
        self.repository
            .schema(survey_id)?
            .ok_or_else(|| ServiceError::SurveyNotFound(survey_id.to_string()))
    }

    /// Score one organization's responses.
    pub fn results(
        &self,
        survey_id: &str,
        organization_id: &str,
    ) -> Result<SurveyResult, ServiceError> {
        let schema = self.schema(survey_id)?;
        let responses = self
            .repository
            .responses(survey_id, Some(organization_id))?;

        let mut result = self.engine.compute_result(&schema, &responses)?;
        result.organization_id = organization_id.to_string();
        Ok(result)
    }

    pub fn statistics(&self, survey_id: &str) -> Result<ResponseStatistics, ServiceError> {
        let schema = self.schema(survey_id)?;
        let responses = self.repository.responses(survey_id, None)?;
        Ok(compute_statistics(&schema, &responses))
    }

    /// Questions a respondent must answer; an empty selection is reported as an error.
    pub fn questions_for(
        &self,
        survey_id: &str,
        stakeholder_id: &str,
        expertise: &[String],
    ) -> Result<Vec<Question>, ServiceError> {
        let schema = self.schema(survey_id)?;
        let questions: Vec<Question> = select_questions(&schema, stakeholder_id, expertise)
            .into_iter()
            .cloned()
            .collect();

        if questions.is_empty() {
            return Err(ServiceError::NoQuestionsForStakeholder(
                stakeholder_id.to_string(),
            ));
        }
        Ok(questions)
    }

    pub fn validate(&self, response: &SurveyResponse) -> Result<ValidationResult, ServiceError> {
        let schema = self.schema(&response.survey_id)?;
        Ok(validate_response(&schema, response))
    }

    /// Cache a freshly started response.
    pub fn begin(&self, mut response: SurveyResponse) -> Result<SurveyResponse, ServiceError> {
        self.schema(&response.survey_id)?;
        response.progress = 0;
        response.completion_time = None;
        self.progress.save(response.clone())?;
        Ok(response)
    }

    /// Merge answers into a cached response, recompute progress, and finalize it once
    /// every visible required question is answered and the submission validates.
    ///
    /// A null answer clears a previously saved one. Saving a finalized response again
    /// replaces the stored copy, and an edit that invalidates it withdraws that copy.
    pub fn save_progress(
        &self,
        response_id: &str,
        answers: BTreeMap<String, Answer>,
        at: DateTime<Utc>,
    ) -> Result<ProgressUpdate, ServiceError> {
        let mut response = self
            .progress
            .load(response_id)?
            .ok_or_else(|| ServiceError::ResponseNotFound(response_id.to_string()))?;
        let schema = self.schema(&response.survey_id)?;

        for (question_id, answer) in answers {
            if answer.is_null() {
                response.responses.remove(&question_id);
            } else {
                response.responses.insert(question_id, answer);
            }
        }

        let validation = validate_response(&schema, &response);
        let finalized = validation.is_valid;

        if finalized {
            response.progress = 100;
            response.completion_time = Some(at);
            self.repository.upsert_response(response.clone())?;
            info!(
                survey = %response.survey_id,
                response = %response.id,
                stakeholder = %response.stakeholder,
                "response finalized"
            );
        } else {
            response.progress = answered_share(&schema, &response).min(99);
            response.completion_time = None;
            if self.repository.remove_response(&response.id)? {
                warn!(
                    survey = %response.survey_id,
                    response = %response.id,
                    "finalized response reopened by an incomplete edit"
                );
            }
        }

        self.progress.save(response.clone())?;

        Ok(ProgressUpdate {
            response,
            validation,
            finalized,
        })
    }
}

/// Percentage of the respondent's visible questions that carry an answer.
fn answered_share(schema: &SurveySchema, response: &SurveyResponse) -> u8 {
    let visible: Vec<&Question> =
        select_questions(schema, &response.stakeholder, &response.expertise)
            .into_iter()
            .filter(|question| is_visible(question, &response.responses))
            .collect();

    if visible.is_empty() {
        return 0;
    }

    let answered = visible
        .iter()
        .filter(|question| !is_blank(response.responses.get(&question.id)))
        .count();

    (answered * 100 / visible.len()) as u8
}

/// Error raised by the survey service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("survey '{0}' not found")]
    SurveyNotFound(String),
    #[error("response '{0}' not found")]
    ResponseNotFound(String),
    #[error("no questions are addressed to stakeholder '{0}'")]
    NoQuestionsForStakeholder(String),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
