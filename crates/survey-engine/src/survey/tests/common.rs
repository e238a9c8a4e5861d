use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::survey::response::SurveyResponse;
use crate::survey::schema::{
    Comparator, ConditionalRule, Domain, MaturityLevel, Question, QuestionOption, QuestionType,
    ScoringConfig, ScoringMethod, Stakeholder, SurveySchema, ValidationRules,
};

pub(crate) fn started_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn question(id: &str, kind: QuestionType, domain: &str, targets: &[&str]) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {id}"),
        kind,
        domain: domain.to_string(),
        target_stakeholders: targets.iter().map(|target| target.to_string()).collect(),
        target_expertise: None,
        required: false,
        options: Vec::new(),
        validation: None,
        conditional: None,
    }
}

pub(crate) fn options(values: &[&str]) -> Vec<QuestionOption> {
    values
        .iter()
        .map(|value| QuestionOption {
            value: json!(value),
            label: value.to_uppercase(),
            description: None,
        })
        .collect()
}

pub(crate) fn band(name: &str, min_score: f64, max_score: f64) -> MaturityLevel {
    MaturityLevel {
        name: name.to_string(),
        min_score,
        max_score,
        description: None,
        recommendations: vec![format!("Review the {name} playbook")],
    }
}

/// Three-role assessment covering process, support and tooling domains.
pub(crate) fn assessment_schema() -> SurveySchema {
    let mut q_process = question(
        "q_process",
        QuestionType::Likert5,
        "process",
        &["manager", "specialist"],
    );
    q_process.required = true;

    let mut q_support = question("q_support", QuestionType::Likert3, "support", &["specialist"]);
    q_support.required = true;

    let q_tooling = question(
        "q_tooling",
        QuestionType::Likert5,
        "tooling",
        &["manager", "specialist"],
    );

    let mut q_budget = question("q_budget", QuestionType::Text, "process", &["manager"]);
    q_budget.validation = Some(ValidationRules {
        min_length: Some(10),
        max_length: Some(200),
        ..ValidationRules::default()
    });

    let mut q_hardening = question(
        "q_hardening",
        QuestionType::Likert5,
        "tooling",
        &["specialist"],
    );
    q_hardening.required = true;
    q_hardening.target_expertise = Some(vec!["security".to_string()]);

    let mut q_channels = question(
        "q_channels",
        QuestionType::MultipleChoice,
        "support",
        &["executive"],
    );
    q_channels.options = options(&["email", "chat", "phone"]);

    let mut q_has_sla = question("q_has_sla", QuestionType::Boolean, "support", &["executive"]);
    q_has_sla.required = true;

    let mut q_sla_detail = question("q_sla_detail", QuestionType::Text, "support", &["executive"]);
    q_sla_detail.required = true;
    q_sla_detail.conditional = Some(ConditionalRule {
        depends_on: "q_has_sla".to_string(),
        condition: Comparator::Equals,
        value: json!(true),
    });

    let mut q_headcount = question("q_headcount", QuestionType::Number, "process", &["executive"]);
    q_headcount.validation = Some(ValidationRules {
        min: Some(1.0),
        max: Some(10_000.0),
        ..ValidationRules::default()
    });

    SurveySchema {
        id: "ops-maturity".to_string(),
        name: "Operations maturity".to_string(),
        version: "2.1".to_string(),
        stakeholders: vec![
            Stakeholder {
                id: "manager".to_string(),
                name: "Manager".to_string(),
                weight: 0.6,
                required_expertise: Vec::new(),
            },
            Stakeholder {
                id: "specialist".to_string(),
                name: "Specialist".to_string(),
                weight: 0.4,
                required_expertise: vec!["security".to_string()],
            },
            Stakeholder {
                id: "executive".to_string(),
                name: "Executive".to_string(),
                weight: 0.0,
                required_expertise: Vec::new(),
            },
        ],
        domains: vec![
            Domain {
                id: "process".to_string(),
                name: "Process".to_string(),
                weight: 0.5,
                description: None,
            },
            Domain {
                id: "support".to_string(),
                name: "Support".to_string(),
                weight: 0.25,
                description: None,
            },
            Domain {
                id: "tooling".to_string(),
                name: "Tooling".to_string(),
                weight: 0.25,
                description: None,
            },
        ],
        questions: vec![
            q_process,
            q_support,
            q_tooling,
            q_budget,
            q_hardening,
            q_channels,
            q_has_sla,
            q_sla_detail,
            q_headcount,
        ],
        scoring: ScoringConfig {
            method: ScoringMethod::WeightedAverage,
            stakeholder_weights: BTreeMap::from([
                ("manager".to_string(), 0.6),
                ("specialist".to_string(), 0.4),
                ("executive".to_string(), 0.0),
            ]),
            domain_weights: BTreeMap::from([
                ("process".to_string(), 0.5),
                ("support".to_string(), 0.25),
                ("tooling".to_string(), 0.25),
            ]),
            maturity_levels: vec![
                band("initial", 0.0, 2.5),
                band("managed", 2.51, 4.0),
                band("optimized", 4.01, 5.0),
            ],
            custom_scorer: None,
        },
    }
}

pub(crate) fn response(id: &str, stakeholder: &str, answers: &[(&str, Value)]) -> SurveyResponse {
    let mut response = SurveyResponse::begin(
        id,
        "ops-maturity",
        "org-1",
        format!("person-{id}"),
        stakeholder,
        started_at(),
    );
    response.responses = answers
        .iter()
        .map(|(question_id, answer)| (question_id.to_string(), answer.clone()))
        .collect();
    response
}

pub(crate) fn completed(
    id: &str,
    stakeholder: &str,
    minutes: i64,
    answers: &[(&str, Value)],
) -> SurveyResponse {
    let mut response = response(id, stakeholder, answers);
    response.progress = 100;
    response.completion_time = Some(started_at() + Duration::minutes(minutes));
    response
}
