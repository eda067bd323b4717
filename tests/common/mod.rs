#![allow(dead_code)]

use serde_json::json;
use truffle_ai::{Agent, TruffleAI, TruffleConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at a mock server, authenticated as `test-key`.
pub fn client_for(server: &MockServer) -> TruffleAI {
    TruffleAI::new(TruffleConfig::new("test-key").with_base_url(server.uri()))
        .expect("client should build")
}

/// Loads an agent handle through a mounted load-agent mock.
pub async fn agent_for(server: &MockServer, agent_id: &str) -> Agent {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/agents/{agent_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "config": {
                    "name": "Test Agent",
                    "instruction": "Be helpful",
                    "selectedModel": "gpt-4"
                }
            }
        })))
        .mount(server)
        .await;

    client_for(server)
        .load_agent(agent_id)
        .await
        .expect("agent should load")
}
