use reqwest::Method;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{Result, TruffleError};
use crate::types::{AgentConfig, AgentUpdate, ChatMessage, RunOptions, RunResponse};
use crate::TruffleAI;

/// Handle to a deployed agent: its id, a config snapshot, and the owning
/// client. Obtained from [`TruffleAI::deploy_agent`] or
/// [`TruffleAI::load_agent`].
///
/// ```no_run
/// # async fn example(client: truffle_ai::TruffleAI) -> truffle_ai::Result<()> {
/// let agent = client.load_agent("agent-id").await?;
///
/// // Run a one-off task
/// let result = agent.run("Summarize this quarter's numbers").await?;
///
/// // Or hold a conversation
/// let chat = agent.chat();
/// let reply = chat.send("Hello!").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Agent {
    id: String,
    config: AgentConfig,
    client: TruffleAI,
}

#[derive(Serialize)]
struct RunPayload<'a> {
    input_data: &'a str,
    #[serde(flatten)]
    options: &'a RunOptions,
}

impl Agent {
    pub(crate) fn bind(id: String, config: AgentConfig, client: TruffleAI) -> Self {
        Self { id, config, client }
    }

    /// The server-assigned agent id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A copy of the agent's configuration. Mutating the returned value
    /// does not affect the handle.
    pub fn config(&self) -> AgentConfig {
        self.config.clone()
    }

    /// Runs a one-off task with default options.
    pub async fn run(&self, input: &str) -> Result<RunResponse> {
        self.run_with_options(input, RunOptions::default()).await
    }

    /// Runs a one-off task. Unset options are left out of the payload
    /// entirely; the service treats an absent key differently from null.
    pub async fn run_with_options(&self, input: &str, options: RunOptions) -> Result<RunResponse> {
        if input.trim().is_empty() {
            return Err(TruffleError::Validation("Input is required".into()));
        }

        let body = serde_json::to_value(RunPayload {
            input_data: input,
            options: &options,
        })?;
        self.client
            .request(Method::POST, &format!("agents/{}/run", self.id), Some(&body))
            .await
    }

    /// Starts a new chat session with this agent. The session owns the
    /// transcript; the agent handle itself holds no conversation state.
    pub fn chat(&self) -> ChatSession {
        ChatSession::new(self.id.clone(), self.client.clone())
    }

    /// Applies a partial update and merges the server-confirmed fields
    /// back into this handle's config snapshot.
    pub async fn update(&mut self, update: AgentUpdate) -> Result<()> {
        let confirmed = self.client.update_agent_wire(&self.id, &update).await?;
        confirmed.merge_into(&mut self.config);
        Ok(())
    }

    /// Deletes the agent on the server. Consumes the handle, so a deleted
    /// agent cannot be called again.
    pub async fn delete(self) -> Result<()> {
        self.client.delete_agent(&self.id).await
    }
}

/// A chat session with one agent.
///
/// The transcript is append-only and always paired: each successful
/// [`send`](Self::send) appends exactly one user message and one assistant
/// message, and a failed send appends nothing. Overlapping sends on a
/// shared session are serialized internally, so the transcript order
/// always matches call order.
#[derive(Debug)]
pub struct ChatSession {
    agent_id: String,
    client: TruffleAI,
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatSession {
    pub(crate) fn new(agent_id: String, client: TruffleAI) -> Self {
        Self {
            agent_id,
            client,
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Id of the agent this session talks to.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Sends a message and returns the assistant's reply.
    ///
    /// The whole transcript plus the new user message goes to the server;
    /// the user/assistant pair is appended only once the exchange
    /// succeeds.
    pub async fn send(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(TruffleError::Validation("Message is required".into()));
        }

        // Lock held across the exchange: overlapping sends apply in call
        // order, and the transcript never shows a partial pair.
        let mut messages = self.messages.lock().await;

        let mut outgoing = messages.clone();
        outgoing.push(ChatMessage::user(message));

        let response = self.client.chat(&self.agent_id, &outgoing).await?;
        let reply = response
            .reply()
            .ok_or_else(|| TruffleError::Api {
                status: 500,
                message: "Chat response contained no assistant message".into(),
            })?
            .to_string();

        messages.push(ChatMessage::user(message));
        messages.push(ChatMessage::assistant(reply.clone()));

        Ok(reply)
    }

    /// A copy of the transcript so far.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    /// Empties the transcript. Purely local; the server keeps nothing
    /// per session.
    pub async fn clear(&self) {
        self.messages.lock().await.clear();
    }
}
