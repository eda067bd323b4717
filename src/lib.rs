//! Rust SDK for the TruffleAI hosted agent platform.
//!
//! The [`TruffleAI`] client holds the API key and base URL and exposes the
//! agent lifecycle. [`Agent`] is a typed handle to one hosted agent, and
//! [`ChatSession`] keeps an ordered transcript across exchanges.
//!
//! ```no_run
//! use truffle_ai::{AgentConfig, TruffleAI, TruffleConfig};
//!
//! # async fn example() -> truffle_ai::Result<()> {
//! let client = TruffleAI::new(TruffleConfig::new("your-api-key"))?;
//!
//! let agent = client
//!     .deploy_agent(
//!         AgentConfig::new("My Assistant", "Help users with their questions", "gpt-4"),
//!         None,
//!     )
//!     .await?;
//!
//! // One-off task
//! let result = agent.run("What is the capital of France?").await?;
//! println!("{}", result.data);
//!
//! // Stateful chat
//! let chat = agent.chat();
//! let reply = chat.send("Hello!").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod agent;
mod error;
mod types;

pub use agent::{Agent, ChatSession};
pub use error::{Result, TruffleError};
pub use reqwest::Method;
pub use types::*;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::types::wire;

/// Client for the TruffleAI API.
///
/// Cloning is cheap and clones share the underlying HTTP connection pool,
/// so one client can back any number of [`Agent`] handles and
/// [`ChatSession`]s concurrently. The client itself holds no mutable state
/// beyond its configuration.
#[derive(Clone)]
pub struct TruffleAI {
    client: reqwest::Client,
    config: TruffleConfig,
}

// Manual impl: the API key must never leak into logs or panic output.
impl std::fmt::Debug for TruffleAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TruffleAI")
            .field("base_url", &self.config.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl TruffleAI {
    /// Creates a new client.
    ///
    /// Fails with [`TruffleError::Validation`] if the API key is empty or
    /// not a valid header value.
    pub fn new(config: TruffleConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TruffleError::Validation("API key is required".into()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let key = config
            .api_key
            .parse()
            .map_err(|_| TruffleError::Validation("API key is not a valid header value".into()))?;
        headers.insert("x-api-key", key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TruffleError::Network(err.to_string()))?;

        Ok(Self { client, config })
    }

    /// Deploys a new agent.
    ///
    /// Required config fields are validated locally before any network
    /// call. If `rag_file` is given it is uploaded first and the returned
    /// document id is merged into the config sent to the server.
    pub async fn deploy_agent(
        &self,
        config: AgentConfig,
        rag_file: Option<RagFile>,
    ) -> Result<Agent> {
        Self::validate_agent_config(&config)?;

        let mut config = config;
        if let Some(file) = rag_file {
            config.document_id = Some(self.upload_rag_file(file).await?);
        }

        let body = serde_json::to_value(&config)?;
        let response: wire::Envelope<wire::DeployData> =
            self.request(Method::POST, "agents", Some(&body)).await?;
        let data = Self::expect_success(response, "Failed to create agent")?;

        Ok(Agent::bind(data.agent_id, config, self.clone()))
    }

    /// Loads an existing agent by id.
    pub async fn load_agent(&self, agent_id: &str) -> Result<Agent> {
        Self::require_agent_id(agent_id)?;

        let response: wire::Envelope<wire::ConfigData> = self
            .request(Method::GET, &format!("agents/{agent_id}"), None)
            .await?;
        let data = Self::expect_success(response, "Failed to load agent")?;

        Ok(Agent::bind(
            agent_id.to_string(),
            data.config.into_config(),
            self.clone(),
        ))
    }

    /// Applies a partial update to an agent and returns the
    /// server-confirmed configuration.
    pub async fn update_agent(&self, agent_id: &str, update: &AgentUpdate) -> Result<AgentConfig> {
        Ok(self.update_agent_wire(agent_id, update).await?.into_config())
    }

    pub(crate) async fn update_agent_wire(
        &self,
        agent_id: &str,
        update: &AgentUpdate,
    ) -> Result<wire::WireAgentConfig> {
        Self::require_agent_id(agent_id)?;

        let body = serde_json::to_value(update)?;
        let response: wire::Envelope<wire::ConfigData> = self
            .request(Method::PUT, &format!("agents/{agent_id}"), Some(&body))
            .await?;
        Ok(Self::expect_success(response, "Failed to update agent")?.config)
    }

    /// Deletes an agent. Succeeding means the server accepted the delete;
    /// there is no local side effect.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        Self::require_agent_id(agent_id)?;

        let _: Value = self
            .request(Method::DELETE, &format!("agents/{agent_id}"), None)
            .await?;
        Ok(())
    }

    /// Stateless chat passthrough: sends the full message list and returns
    /// the decoded response. [`ChatSession`] builds on this.
    pub async fn chat(&self, agent_id: &str, messages: &[ChatMessage]) -> Result<ChatResponse> {
        Self::require_agent_id(agent_id)?;

        let body = serde_json::json!({ "messages": messages });
        self.request(
            Method::POST,
            &format!("agents/{agent_id}/chat"),
            Some(&body),
        )
        .await
    }

    /// Uploads a file for RAG processing and returns its document id.
    ///
    /// Sent as multipart form data under the field name `file`; the
    /// content type of the request is left to the multipart boundary.
    pub async fn upload_rag_file(&self, file: RagFile) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|err| TruffleError::Validation(format!("Invalid MIME type: {err}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(endpoint = "rag/upload", "uploading RAG file");
        let upload: wire::UploadData = self
            .dispatch(self.client.post(self.url("rag/upload")).multipart(form))
            .await?;
        Ok(upload.document_id)
    }

    /// Makes an authenticated JSON request against an arbitrary endpoint.
    ///
    /// This is the escape hatch every typed method above goes through;
    /// callers can use it directly for endpoints the SDK does not model.
    /// `endpoint` is relative to `{base_url}/api/v1/`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let mut request = self.client.request(method.clone(), self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, endpoint, "dispatching API request");
        self.dispatch(request).await
    }

    /// Sends one prepared request and classifies the outcome.
    async fn dispatch<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|err| TruffleError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TruffleError::Network(err.to_string()))?;

        debug!(status = status.as_u16(), "API response received");

        if !status.is_success() {
            return Err(Self::classify_failure(status.as_u16(), body));
        }

        // Some endpoints (delete in particular) answer with no body.
        if body.is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn classify_failure(status: u16, body: String) -> TruffleError {
        // Error bodies are `{ "error": string }`; anything else is passed
        // through as raw text.
        let message = serde_json::from_str::<wire::ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);

        match status {
            401 => TruffleError::Authentication(message),
            429 => TruffleError::RateLimited(message),
            status => TruffleError::Api { status, message },
        }
    }

    /// Unwraps a `{ success, data }` envelope, treating `success: false`
    /// as a failed request regardless of HTTP status.
    fn expect_success<T>(envelope: wire::Envelope<T>, context: &str) -> Result<T> {
        match envelope {
            wire::Envelope {
                success: true,
                data: Some(data),
            } => Ok(data),
            _ => Err(TruffleError::Api {
                status: 500,
                message: context.to_string(),
            }),
        }
    }

    fn validate_agent_config(config: &AgentConfig) -> Result<()> {
        let mut missing = Vec::new();
        if config.name.trim().is_empty() {
            missing.push("name");
        }
        if config.instruction.trim().is_empty() {
            missing.push("instruction");
        }
        if config.model.trim().is_empty() {
            missing.push("model");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TruffleError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    fn require_agent_id(agent_id: &str) -> Result<()> {
        if agent_id.trim().is_empty() {
            return Err(TruffleError::Validation("Agent ID is required".into()));
        }
        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/v1/{endpoint}",
            self.config.base_url.trim_end_matches('/')
        )
    }
}
