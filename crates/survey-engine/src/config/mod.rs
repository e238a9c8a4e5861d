use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How several respondents sharing a stakeholder role are folded into one domain score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeholderAggregation {
    /// Every response within the role counts equally; the role weight applies once.
    MeanOfResponses,
    /// The last scored response of the role replaces earlier ones.
    LastResponse,
}

impl StakeholderAggregation {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mean" | "average" => Some(Self::MeanOfResponses),
            "last" | "overwrite" => Some(Self::LastResponse),
            _ => None,
        }
    }
}

pub const DEFAULT_LOW_SCORE_THRESHOLD: f64 = 2.5;

/// Scoring dials shared by every engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Domains scoring below this value receive an improvement recommendation.
    pub low_score_threshold: f64,
    pub stakeholder_aggregation: StakeholderAggregation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_score_threshold: DEFAULT_LOW_SCORE_THRESHOLD,
            stakeholder_aggregation: StakeholderAggregation::MeanOfResponses,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("SURVEY_LOW_SCORE_THRESHOLD") {
            config.low_score_threshold = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or(ConfigError::InvalidThreshold { value: raw })?;
        }

        if let Ok(raw) = env::var("SURVEY_STAKEHOLDER_AGGREGATION") {
            config.stakeholder_aggregation = StakeholderAggregation::parse(&raw)
                .ok_or(ConfigError::InvalidAggregation { value: raw })?;
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold { value: String },
    InvalidAggregation { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "SURVEY_LOW_SCORE_THRESHOLD must be a finite number (got '{value}')"
            ),
            ConfigError::InvalidAggregation { value } => write!(
                f,
                "SURVEY_STAKEHOLDER_AGGREGATION must be 'mean' or 'last' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
