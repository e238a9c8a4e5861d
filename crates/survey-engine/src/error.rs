/// Failure of a single scoring call. Degenerate input never produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("unsupported scoring method '{0}'")]
    UnsupportedScoringMethod(String),
    #[error("custom scorer '{scorer}' failed: {message}")]
    CustomScoringExecution { scorer: String, message: String },
}
