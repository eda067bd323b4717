//! Agent handle tests: run payloads, config snapshots, update, delete.

mod common;

use common::agent_for;
use serde_json::json;
use truffle_ai::{AgentUpdate, RunOptions, TruffleError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn run_rejects_empty_and_whitespace_input() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    for input in ["", "   ", "\n\t"] {
        let err = agent.run(input).await.unwrap_err();
        assert!(matches!(err, TruffleError::Validation(_)), "got {err:?}");
    }
}

#[tokio::test]
async fn run_payload_omits_unset_options() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    // Exact body match: json_mode/json_format keys must be absent, not null.
    Mock::given(method("POST"))
        .and(path("/api/v1/agents/a1/run"))
        .and(body_json(json!({ "input_data": "What is 2+2?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": "4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = agent.run("What is 2+2?").await.expect("run should succeed");
    assert!(response.success);
    assert_eq!(response.data, json!("4"));
    assert!(response.error.is_none());
}

#[tokio::test]
async fn run_with_options_includes_only_set_fields() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/agents/a1/run"))
        .and(body_json(json!({
            "input_data": "List three colors",
            "json_mode": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "colors": ["red", "green", "blue"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = agent
        .run_with_options(
            "List three colors",
            RunOptions {
                json_mode: Some(true),
                json_format: None,
            },
        )
        .await
        .expect("run should succeed");

    assert_eq!(response.data["colors"][0], "red");
}

#[tokio::test]
async fn config_accessor_returns_a_defensive_copy() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    let mut copy = agent.config();
    copy.name = "mutated".to_string();
    copy.tool = Some("hammer".to_string());

    assert_eq!(agent.config().name, "Test Agent");
    assert!(agent.config().tool.is_none());
}

#[tokio::test]
async fn update_merges_confirmed_fields_into_the_handle() {
    let server = MockServer::start().await;
    let mut agent = agent_for(&server, "a1").await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/agents/a1"))
        .and(body_json(json!({ "instruction": "Be terse" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "config": { "instruction": "Be terse" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    agent
        .update(AgentUpdate {
            instruction: Some("Be terse".to_string()),
            ..Default::default()
        })
        .await
        .expect("update should succeed");

    let config = agent.config();
    assert_eq!(config.instruction, "Be terse");
    // Fields the server did not echo keep their local value.
    assert_eq!(config.name, "Test Agent");
    assert_eq!(config.model, "gpt-4");
}

#[tokio::test]
async fn update_surfaces_application_level_failure() {
    let server = MockServer::start().await;
    let mut agent = agent_for(&server, "a1").await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/agents/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = agent
        .update(AgentUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TruffleError::Api { status: 500, .. }), "got {err:?}");
}

#[tokio::test]
async fn delete_consumes_the_handle() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/agents/a1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    agent.delete().await.expect("delete should succeed");
    // `agent` is moved; further calls are a compile error rather than a
    // runtime "deleted" flag.
}

#[tokio::test]
async fn loaded_config_round_trips() {
    let server = MockServer::start().await;
    let agent = agent_for(&server, "a1").await;

    let config = agent.config();
    assert_eq!(config.name, "Test Agent");
    assert_eq!(config.instruction, "Be helpful");
    assert_eq!(config.model, "gpt-4");
    assert_eq!(agent.config(), config);
}
