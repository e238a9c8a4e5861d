use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::survey::{SurveyResponse, SurveySchema};

/// Storage abstraction for published schemas and submitted responses.
pub trait SurveyRepository: Send + Sync {
    fn store_schema(&self, schema: SurveySchema) -> Result<(), RepositoryError>;
    fn schema(&self, survey_id: &str) -> Result<Option<SurveySchema>, RepositoryError>;
    fn store_response(&self, response: SurveyResponse) -> Result<(), RepositoryError>;
    /// Insert or replace a response keyed by its id.
    fn upsert_response(&self, response: SurveyResponse) -> Result<(), RepositoryError>;
    /// Withdraw a stored response; returns whether one was present.
    fn remove_response(&self, response_id: &str) -> Result<bool, RepositoryError>;
    /// Responses for a survey, optionally narrowed to one organization.
    fn responses(
        &self,
        survey_id: &str,
        organization_id: Option<&str>,
    ) -> Result<Vec<SurveyResponse>, RepositoryError>;
}

/// Partial-answer cache for responses still being filled in.
pub trait ProgressStore: Send + Sync {
    fn load(&self, response_id: &str) -> Result<Option<SurveyResponse>, RepositoryError>;
    fn save(&self, response: SurveyResponse) -> Result<(), RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store backing both traits; used by the CLI and tests.
#[derive(Debug, Default)]
pub struct InMemorySurveyStore {
    schemas: Mutex<BTreeMap<String, SurveySchema>>,
    responses: Mutex<BTreeMap<String, SurveyResponse>>,
    drafts: Mutex<BTreeMap<String, SurveyResponse>>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

impl SurveyRepository for InMemorySurveyStore {
    fn store_schema(&self, schema: SurveySchema) -> Result<(), RepositoryError> {
        lock(&self.schemas)?.insert(schema.id.clone(), schema);
        Ok(())
    }

    fn schema(&self, survey_id: &str) -> Result<Option<SurveySchema>, RepositoryError> {
        Ok(lock(&self.schemas)?.get(survey_id).cloned())
    }

    fn store_response(&self, response: SurveyResponse) -> Result<(), RepositoryError> {
        let mut responses = lock(&self.responses)?;
        if responses.contains_key(&response.id) {
            return Err(RepositoryError::Conflict);
        }
        responses.insert(response.id.clone(), response);
        Ok(())
    }

    fn upsert_response(&self, response: SurveyResponse) -> Result<(), RepositoryError> {
        lock(&self.responses)?.insert(response.id.clone(), response);
        Ok(())
    }

    fn remove_response(&self, response_id: &str) -> Result<bool, RepositoryError> {
        Ok(lock(&self.responses)?.remove(response_id).is_some())
    }

    fn responses(
        &self,
        survey_id: &str,
        organization_id: Option<&str>,
    ) -> Result<Vec<SurveyResponse>, RepositoryError> {
        Ok(lock(&self.responses)?
            .values()
            .filter(|response| response.survey_id == survey_id)
            .filter(|response| {
                organization_id
                    .map(|organization| response.organization_id == organization)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }
}

impl ProgressStore for InMemorySurveyStore {
    fn load(&self, response_id: &str) -> Result<Option<SurveyResponse>, RepositoryError> {
        Ok(lock(&self.drafts)?.get(response_id).cloned())
    }

    fn save(&self, response: SurveyResponse) -> Result<(), RepositoryError> {
        lock(&self.drafts)?.insert(response.id.clone(), response);
        Ok(())
    }
}
