use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use survey_engine::repository::{InMemorySurveyStore, SurveyRepository};
use survey_engine::service::SurveyService;
use survey_engine::{ScoringEngine, SurveyResponse, SurveySchema};
use tracing::{info, warn};

use crate::error::AppError;

pub(crate) fn read_schema(path: &Path) -> Result<SurveySchema, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn read_responses(path: &Path) -> Result<Vec<SurveyResponse>, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Schema and responses loaded from disk into an in-memory store.
pub(crate) struct Workspace {
    pub(crate) schema: SurveySchema,
    pub(crate) responses: Vec<SurveyResponse>,
    pub(crate) engine: Arc<ScoringEngine>,
    pub(crate) service: SurveyService<InMemorySurveyStore, InMemorySurveyStore>,
}

impl Workspace {
    pub(crate) fn open(
        schema_path: &Path,
        responses_path: Option<&Path>,
        engine: ScoringEngine,
    ) -> Result<Self, AppError> {
        let schema = read_schema(schema_path)?;
        let store = Arc::new(InMemorySurveyStore::new());
        let engine = Arc::new(engine);
        let service = SurveyService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&engine));
        service.ingest_schema(schema.clone())?;

        let mut responses = Vec::new();
        if let Some(path) = responses_path {
            for response in read_responses(path)? {
                if response.survey_id != schema.id {
                    warn!(
                        response = %response.id,
                        survey = %response.survey_id,
                        expected = %schema.id,
                        "skipping response recorded for a different survey"
                    );
                    continue;
                }
                store
                    .store_response(response.clone())
                    .map_err(survey_engine::service::ServiceError::from)?;
                responses.push(response);
            }
        }

        info!(
            survey = %schema.id,
            responses = responses.len(),
            "survey workspace loaded"
        );

        Ok(Self {
            schema,
            responses,
            engine,
            service,
        })
    }
}
