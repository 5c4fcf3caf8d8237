//! Checkmate LLM Provider Layer
//!
//! Chat model adapters behind a common, provider-neutral interface.
//!
//! # Architecture
//!
//! This crate defines the conversation model ([`Message`], [`ModelReply`],
//! [`ToolCall`], [`ToolDeclaration`]) and the [`ChatModel`] trait the
//! verification engine drives. Adapters translate conversations into their
//! provider's wire format.
//!
//! # Providers
//!
//! - `ScriptedModel`: Deterministic scripted model for testing
//! - `GeminiModel`: Google Gemini `generateContent` API with function calling
//!
//! # Examples
//!
//! ```
//! use checkmate_llm::{ChatModel, ChatRequest, Message, ModelReply, ScriptedModel};
//!
//! # async fn example() {
//! let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: True] Yes.")]);
//! let messages = vec![Message::User("Is water wet?".to_string())];
//! let reply = model.send(ChatRequest::plain(&messages)).await.unwrap();
//! assert_eq!(reply.text.as_deref(), Some("[VERDICT: True] Yes."));
//! # }
//! ```

#![warn(missing_docs)]

pub mod conversation;
pub mod gemini;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use conversation::{
    ChatRequest, Message, ModelReply, ToolCall, ToolDeclaration, ToolMode, ToolParameter,
};
pub use gemini::GeminiModel;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A chat model that can take one conversational turn
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and return the model's next turn
    async fn send(&self, request: ChatRequest<'_>) -> Result<ModelReply, LlmError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    async fn send(&self, request: ChatRequest<'_>) -> Result<ModelReply, LlmError> {
        (**self).send(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// A request as seen by [`ScriptedModel`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Conversation history at the time of the call
    pub messages: Vec<Message>,
    /// Names of the declared tools
    pub tool_names: Vec<String>,
    /// Tool mode requested
    pub tool_mode: ToolMode,
}

enum ScriptStep {
    Reply(ModelReply),
    Fail(LlmError),
}

/// Scripted chat model for deterministic testing
///
/// Replays a fixed sequence of replies (or failures) without any network
/// calls and records every request it receives. Clones share the script
/// and the recorded requests.
///
/// # Examples
///
/// ```
/// use checkmate_llm::{LlmError, ModelReply, ScriptedModel};
///
/// let model = ScriptedModel::new(vec![ModelReply::text("first")])
///     .then_fail(LlmError::RateLimitExceeded);
/// assert_eq!(model.remaining(), 2);
/// ```
#[derive(Clone)]
pub struct ScriptedModel {
    script: Arc<Mutex<VecDeque<ScriptStep>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    /// Create a model that answers with `replies`, in order
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                replies.into_iter().map(ScriptStep::Reply).collect(),
            )),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Create a model whose first call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::new(Vec::new()).then_fail(error)
    }

    /// Append a reply to the script
    pub fn then_reply(self, reply: ModelReply) -> Self {
        self.push(ScriptStep::Reply(reply));
        self
    }

    /// Append a failure to the script
    pub fn then_fail(self, error: LlmError) -> Self {
        self.push(ScriptStep::Fail(error));
        self
    }

    /// Sleep this long before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Script steps not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn push(&self, step: ScriptStep) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn send(&self, request: ChatRequest<'_>) -> Result<ModelReply, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                messages: request.messages.to_vec(),
                tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
                tool_mode: request.tool_mode,
            });
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let step = self
            .script
            .lock()
            .map_err(|_| LlmError::Other("Script lock poisoned".to_string()))?
            .pop_front();

        match step {
            Some(ScriptStep::Reply(reply)) => Ok(reply),
            Some(ScriptStep::Fail(error)) => Err(error),
            None => Err(LlmError::InvalidResponse(
                "Scripted model has no more replies".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
