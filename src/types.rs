use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default production endpoint of the TruffleAI service.
pub const DEFAULT_BASE_URL: &str = "https://www.trytruffle.ai";

/// Configuration for a [`TruffleAI`](crate::TruffleAI) client.
#[derive(Debug, Clone)]
pub struct TruffleConfig {
    /// API key sent as the `x-api-key` header on every request.
    pub api_key: String,
    /// Base URL of the service; paths are resolved under `{base_url}/api/v1/`.
    pub base_url: String,
    /// Optional per-request timeout applied to the underlying HTTP client.
    pub timeout: Option<Duration>,
}

impl TruffleConfig {
    /// Config pointing at the production service.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Override the base URL, e.g. for a staging deployment or a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration of a hosted agent.
///
/// `name`, `instruction`, and `model` are required and validated locally
/// before deployment; the rest is optional. Unset optional fields are
/// omitted from the wire entirely, never sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub instruction: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<serde_json::Value>,
    /// Reference to an uploaded RAG document, filled in by
    /// [`deploy_agent`](crate::TruffleAI::deploy_agent) after a file upload.
    #[serde(
        default,
        rename = "documentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub document_id: Option<String>,
}

impl AgentConfig {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            model: model.into(),
            tool: None,
            components: None,
            document_id: None,
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_components(mut self, components: serde_json::Value) -> Self {
        self.components = Some(components);
        self
    }
}

/// Partial agent configuration for updates. Unset fields are left out of
/// the request body and keep their server-side value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<serde_json::Value>,
}

/// Sender of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Response from the chat endpoint.
///
/// Current servers put the assistant text in `message`; older deployments
/// used `data`. [`reply`](Self::reply) resolves the two in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ChatResponse {
    /// The assistant reply, preferring the `message` field over the
    /// legacy `data` field.
    pub fn reply(&self) -> Option<&str> {
        self.message.as_deref().or(self.data.as_deref())
    }
}

/// Response from a one-off [`run`](crate::Agent::run).
#[derive(Debug, Clone, Deserialize)]
pub struct RunResponse {
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

/// Optional settings for a one-off run. Unset fields are omitted from the
/// payload; the service distinguishes an absent key from an explicit null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<String>,
}

/// A document to upload for RAG processing.
#[derive(Debug, Clone)]
pub struct RagFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RagFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Wire shapes the API wraps around payloads. Kept separate from the
/// public types so field-name drift on the server side stays contained.
pub(crate) mod wire {
    use serde::Deserialize;

    use super::AgentConfig;

    /// `{ success, data }` wrapper used by the agent lifecycle endpoints.
    #[derive(Debug, Deserialize)]
    pub struct Envelope<T> {
        #[serde(default)]
        pub success: bool,
        pub data: Option<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DeployData {
        pub agent_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConfigData {
        pub config: WireAgentConfig,
    }

    #[derive(Debug, Deserialize)]
    pub struct UploadData {
        #[serde(rename = "documentId")]
        pub document_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
    }

    /// Agent config as the server returns it. Loaded configs spell the
    /// model and tool as `selectedModel`/`selectedTool`; updates echo the
    /// plain names. Both are accepted, the `selected*` spelling wins.
    #[derive(Debug, Default, Deserialize)]
    pub struct WireAgentConfig {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub instruction: Option<String>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default, rename = "selectedModel")]
        pub selected_model: Option<String>,
        #[serde(default)]
        pub tool: Option<String>,
        #[serde(default, rename = "selectedTool")]
        pub selected_tool: Option<String>,
        #[serde(default)]
        pub components: Option<serde_json::Value>,
        #[serde(default, rename = "documentId")]
        pub document_id: Option<String>,
    }

    impl WireAgentConfig {
        pub fn into_config(self) -> AgentConfig {
            let mut config = AgentConfig::new("", "", "");
            self.merge_into(&mut config);
            config
        }

        /// Overlay every field the server reported onto a local config,
        /// leaving fields the server omitted untouched.
        pub fn merge_into(self, config: &mut AgentConfig) {
            if let Some(name) = self.name {
                config.name = name;
            }
            if let Some(instruction) = self.instruction {
                config.instruction = instruction;
            }
            if let Some(model) = self.selected_model.or(self.model) {
                config.model = model;
            }
            if let Some(tool) = self.selected_tool.or(self.tool) {
                config.tool = Some(tool);
            }
            if let Some(components) = self.components {
                config.components = Some(components);
            }
            if let Some(document_id) = self.document_id {
                config.document_id = Some(document_id);
            }
        }
    }
}
