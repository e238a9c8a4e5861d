use std::collections::BTreeMap;

use serde_json::json;

use crate::config::{EngineConfig, StakeholderAggregation};
use crate::scoring::{compute_result, domain_rows, ScoringEngine};
use crate::survey::tests::common::*;
use crate::survey::QuestionType;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn manager_and_specialist_blend_per_domain() {
    let schema = assessment_schema();
    let responses = vec![
        completed(
            "r-mgr",
            "manager",
            30,
            &[("q_process", json!(4)), ("q_tooling", json!(2))],
        ),
        completed(
            "r-spec",
            "specialist",
            45,
            &[
                ("q_process", json!(2)),
                ("q_support", json!(3)),
                ("q_tooling", json!(4)),
            ],
        ),
    ];

    let result = compute_result(&schema, &responses).expect("weighted scoring succeeds");

    // process: (4 * 0.6 + 2 * 0.4) / 1.0
    assert!(close(result.domain_scores["process"], 3.2));
    // support: specialist only
    assert!(close(result.domain_scores["support"], 3.0));
    // tooling: (2 * 0.6 + 4 * 0.4) / 1.0
    assert!(close(result.domain_scores["tooling"], 2.8));
    assert!(close(
        result.overall_score,
        3.2 * 0.5 + 3.0 * 0.25 + 2.8 * 0.25
    ));

    assert!(close(result.stakeholder_contributions["process"]["manager"], 2.4));
    assert!(close(
        result.stakeholder_contributions["process"]["specialist"],
        0.8
    ));
    assert!(!result.stakeholder_contributions["support"].contains_key("manager"));

    assert_eq!(
        result.maturity_level.as_ref().map(|level| level.name.as_str()),
        Some("managed")
    );
    assert_eq!(result.recommendations, vec!["Review the managed playbook"]);
    assert_eq!(result.response_count, 2);
    assert_eq!(result.stakeholder_breakdown["manager"], 1);
    assert_eq!(result.organization_id, "org-1");
    assert_eq!(
        result.completion_date,
        responses[1].completion_time,
        "latest completion wins"
    );
}

#[test]
fn weak_domains_receive_focus_recommendations_in_schema_order() {
    let schema = assessment_schema();
    let responses = vec![response(
        "r-mgr",
        "manager",
        &[("q_process", json!(2)), ("q_tooling", json!(1))],
    )];

    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(
        result.recommendations,
        vec![
            "Review the initial playbook".to_string(),
            "Focus on improving Process capabilities".to_string(),
            "Focus on improving Support capabilities".to_string(),
            "Focus on improving Tooling capabilities".to_string(),
        ]
    );
}

#[test]
fn non_numeric_answers_are_ignored_by_domain_averages() {
    let schema = assessment_schema();
    let responses = vec![response(
        "r-mgr",
        "manager",
        &[
            ("q_process", json!(5)),
            ("q_budget", json!("Quarterly budget reviews with finance")),
        ],
    )];

    let result = compute_result(&schema, &responses).expect("scores");

    assert!(close(result.domain_scores["process"], 5.0));
    assert!(close(result.domain_scores["tooling"], 0.0));
    assert!(result.stakeholder_contributions["tooling"].is_empty());
}

#[test]
fn respondents_within_a_role_are_averaged() {
    let schema = assessment_schema();
    let responses = vec![
        response("r-1", "manager", &[("q_process", json!(5))]),
        response("r-2", "manager", &[("q_process", json!(1))]),
        response("r-3", "manager", &[("q_tooling", json!(4))]),
    ];

    let result = compute_result(&schema, &responses).expect("scores");

    assert!(close(result.domain_scores["process"], 3.0));
    assert!(close(result.stakeholder_contributions["process"]["manager"], 1.8));
    assert!(close(result.domain_scores["tooling"], 4.0));
}

#[test]
fn last_response_aggregation_reproduces_overwrite() {
    let schema = assessment_schema();
    let responses = vec![
        response("r-1", "manager", &[("q_process", json!(5))]),
        response("r-2", "manager", &[("q_process", json!(1))]),
    ];
    let engine = ScoringEngine::new(EngineConfig {
        stakeholder_aggregation: StakeholderAggregation::LastResponse,
        ..EngineConfig::default()
    });

    let result = engine.compute_result(&schema, &responses).expect("scores");

    assert!(close(result.domain_scores["process"], 1.0));
}

#[test]
fn two_domain_single_stakeholder_scenario() {
    let mut schema = assessment_schema();
    schema.domains.truncate(2);
    schema.stakeholders.truncate(1);
    schema.questions = vec![
        question("q1", QuestionType::Likert5, "process", &["manager"]),
        question("q2", QuestionType::Likert5, "support", &["manager"]),
    ];
    schema.scoring.stakeholder_weights = BTreeMap::from([("manager".to_string(), 1.0)]);
    schema.scoring.domain_weights = BTreeMap::from([
        ("process".to_string(), 0.5),
        ("support".to_string(), 0.5),
    ]);

    let responses = vec![response(
        "r-1",
        "manager",
        &[("q1", json!(4)), ("q2", json!(4))],
    )];
    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(result.domain_scores["process"], 4.0);
    assert_eq!(result.domain_scores["support"], 4.0);
    assert_eq!(result.overall_score, 4.0);

    let empty = compute_result(&schema, &[]).expect("empty input scores");
    assert_eq!(empty.overall_score, 0.0);
    assert_eq!(empty.response_count, 0);
    assert!(!empty.has_data());
}

#[test]
fn zero_stakeholder_weights_floor_the_score() {
    let mut schema = assessment_schema();
    for weight in schema.scoring.stakeholder_weights.values_mut() {
        *weight = 0.0;
    }
    let responses = vec![completed(
        "r-mgr",
        "manager",
        10,
        &[("q_process", json!(5)), ("q_tooling", json!(5))],
    )];

    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(result.overall_score, 0.0);
    assert!(result.domain_scores.values().all(|score| *score == 0.0));
}

#[test]
fn stakeholders_missing_from_weight_table_do_not_contribute() {
    let mut schema = assessment_schema();
    schema.scoring.stakeholder_weights = BTreeMap::from([("manager".to_string(), 0.0)]);
    let responses = vec![response(
        "r-spec",
        "specialist",
        &[("q_process", json!(5))],
    )];

    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(result.overall_score, 0.0);
    assert_eq!(result.domain_scores["process"], 0.0);
    assert!(result.stakeholder_contributions["process"].is_empty());
    assert_eq!(result.response_count, 1);
}

#[test]
fn domains_missing_from_weight_table_carry_no_weight() {
    let mut schema = assessment_schema();
    schema.scoring.domain_weights = BTreeMap::from([("process".to_string(), 1.0)]);
    let responses = vec![response(
        "r-mgr",
        "manager",
        &[("q_process", json!(2)), ("q_tooling", json!(5))],
    )];

    let result = compute_result(&schema, &responses).expect("scores");

    assert!(close(result.domain_scores["tooling"], 5.0));
    assert!(close(result.overall_score, result.domain_scores["process"]));
}

#[test]
fn zero_domain_weights_yield_zero_not_nan() {
    let mut schema = assessment_schema();
    for weight in schema.scoring.domain_weights.values_mut() {
        *weight = 0.0;
    }
    let responses = vec![response("r-mgr", "manager", &[("q_process", json!(5))])];

    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(result.overall_score, 0.0);
    assert!(close(result.domain_scores["process"], 5.0));
}

#[test]
fn uniform_domain_scores_collapse_to_the_constant() {
    let schema = assessment_schema();
    let responses = vec![
        response(
            "r-mgr",
            "manager",
            &[("q_process", json!(3)), ("q_tooling", json!(3))],
        ),
        response(
            "r-spec",
            "specialist",
            &[
                ("q_process", json!(3)),
                ("q_support", json!(3)),
                ("q_tooling", json!(3)),
            ],
        ),
    ];

    let result = compute_result(&schema, &responses).expect("scores");

    assert!(close(result.overall_score, 3.0));
}

#[test]
fn undeclared_stakeholders_are_counted_but_not_scored() {
    let schema = assessment_schema();
    let responses = vec![response("r-x", "auditor", &[("q_process", json!(5))])];

    let result = compute_result(&schema, &responses).expect("scores");

    assert_eq!(result.overall_score, 0.0);
    assert_eq!(result.stakeholder_breakdown["auditor"], 1);
}

#[test]
fn scoring_is_idempotent() {
    let schema = assessment_schema();
    let responses = vec![
        completed("r-1", "manager", 12, &[("q_process", json!(4))]),
        completed("r-2", "specialist", 20, &[("q_support", json!(2))]),
    ];

    let first = compute_result(&schema, &responses).expect("scores");
    let second = compute_result(&schema, &responses).expect("scores");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn domain_rows_follow_schema_order() {
    let schema = assessment_schema();
    let responses = vec![response("r-1", "manager", &[("q_process", json!(4))])];
    let result = compute_result(&schema, &responses).expect("scores");

    let rows = domain_rows(&schema, &result);

    let ids: Vec<&str> = rows.iter().map(|row| row.domain_id.as_str()).collect();
    assert_eq!(ids, vec!["process", "support", "tooling"]);
    assert_eq!(rows[0].contributing_stakeholders, 1);
    assert!(close(rows[0].score, 4.0));
}
