use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use survey_engine::config::AppConfig;
use survey_engine::scoring::domain_rows;
use survey_engine::{check_integrity, compute_statistics, validate_response, ScoringEngine};
use tracing::info;

use crate::error::AppError;
use crate::input::{read_schema, Workspace};
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "survey-engine",
    about = "Score, validate, and summarise multi-stakeholder maturity surveys",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a schema document for dangling references and band overlaps
    Check(SchemaArgs),
    /// List the questions addressed to a stakeholder
    Questions(QuestionsArgs),
    /// Validate every response against its stakeholder's questions
    Validate(SurveyArgs),
    /// Compute domain scores, maturity level, and recommendations
    Score(ScoreArgs),
    /// Summarise completion and coverage statistics
    Stats(SurveyArgs),
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Survey schema JSON document
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Args, Debug)]
struct QuestionsArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Stakeholder role identifier
    #[arg(long)]
    stakeholder: String,
    /// Expertise tag held by the respondent (repeatable)
    #[arg(long = "expertise")]
    expertise: Vec<String>,
}

#[derive(Args, Debug)]
struct SurveyArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// JSON array of survey responses
    #[arg(long)]
    responses: PathBuf,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[command(flatten)]
    survey: SurveyArgs,
    /// Restrict scoring to a single organization
    #[arg(long)]
    organization: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config)?;
    info!(environment = ?config.environment, "survey engine starting");

    let engine = ScoringEngine::new(config.engine.clone());

    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Questions(args) => run_questions(args, engine),
        Command::Validate(args) => run_validate(args, engine),
        Command::Score(args) => run_score(args, engine),
        Command::Stats(args) => run_stats(args, engine),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_check(args: SchemaArgs) -> Result<(), AppError> {
    let schema = read_schema(&args.schema)?;
    check_integrity(&schema)?;
    println!(
        "schema '{}' v{} is consistent: {} stakeholder(s), {} domain(s), {} question(s)",
        schema.id,
        schema.version,
        schema.stakeholders.len(),
        schema.domains.len(),
        schema.questions.len()
    );
    Ok(())
}

fn run_questions(args: QuestionsArgs, engine: ScoringEngine) -> Result<(), AppError> {
    let workspace = Workspace::open(&args.schema.schema, None, engine)?;
    let questions = workspace.service.questions_for(
        &workspace.schema.id,
        &args.stakeholder,
        &args.expertise,
    )?;
    print_json(&questions)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseValidationView<'a> {
    response_id: &'a str,
    stakeholder: &'a str,
    #[serde(flatten)]
    result: survey_engine::ValidationResult,
}

fn run_validate(args: SurveyArgs, engine: ScoringEngine) -> Result<(), AppError> {
    let workspace = Workspace::open(
        &args.schema.schema,
        Some(args.responses.as_path()),
        engine,
    )?;
    let views: Vec<ResponseValidationView<'_>> = workspace
        .responses
        .iter()
        .map(|response| ResponseValidationView {
            response_id: &response.id,
            stakeholder: &response.stakeholder,
            result: validate_response(&workspace.schema, response),
        })
        .collect();

    let invalid = views.iter().filter(|view| !view.result.is_valid).count();
    info!(responses = views.len(), invalid, "validation complete");
    print_json(&views)
}

fn run_score(args: ScoreArgs, engine: ScoringEngine) -> Result<(), AppError> {
    let survey = args.survey;
    let workspace = Workspace::open(
        &survey.schema.schema,
        Some(survey.responses.as_path()),
        engine,
    )?;

    let result = match args.organization.as_deref() {
        Some(organization) => workspace
            .service
            .results(&workspace.schema.id, organization)?,
        None => workspace
            .engine
            .compute_result(&workspace.schema, &workspace.responses)
            .map_err(survey_engine::service::ServiceError::from)?,
    };

    if !result.has_data() {
        info!(survey = %result.survey_id, "no responses scored; scores indicate missing data");
    }

    match args.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in domain_rows(&workspace.schema, &result) {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

fn run_stats(args: SurveyArgs, engine: ScoringEngine) -> Result<(), AppError> {
    let workspace = Workspace::open(
        &args.schema.schema,
        Some(args.responses.as_path()),
        engine,
    )?;
    let stats = compute_statistics(&workspace.schema, &workspace.responses);
    print_json(&stats)
}
