//! Gemini Provider Implementation
//!
//! Provides integration with Google's Gemini `generateContent` REST API,
//! including function calling.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Configurable endpoint, model and timeout
//! - Function declarations and calling modes (`AUTO`, `ANY`, `NONE`)
//! - HTTP status mapped onto [`LlmError`] variants
//!
//! No retries are performed; a failed call is reported to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use checkmate_domain::Credentials;
//! use checkmate_llm::GeminiModel;
//!
//! let credentials = Credentials::new("model-key", "search-key").unwrap();
//! let model = GeminiModel::new(&credentials, "gemini-1.5-pro").unwrap();
//! ```

use crate::conversation::{ChatRequest, Message, ModelReply, ToolCall, ToolDeclaration, ToolMode};
use crate::{ChatModel, LlmError};
use async_trait::async_trait;
use checkmate_domain::Credentials;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Default timeout for model requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API chat model
pub struct GeminiModel {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet {
    function_declarations: Vec<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Serialize)]
struct FunctionCallingConfig {
    mode: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiModel {
    /// Create a new Gemini model client
    ///
    /// # Parameters
    ///
    /// - `credentials`: Source of the model API key
    /// - `model`: Model to use (e.g., "gemini-1.5-pro")
    pub fn new(credentials: &Credentials, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(
            credentials,
            model,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client with an explicit HTTP timeout
    pub fn with_timeout(
        credentials: &Credentials,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: credentials.model_api_key().to_string(),
            timeout,
            client,
        })
    }

    /// HTTP timeout applied to each request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Point the client at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(request: &ChatRequest<'_>) -> GenerateContentRequest {
        let contents = request.messages.iter().map(message_to_content).collect();

        let (tools, tool_config) = if request.tools.is_empty() {
            (Vec::new(), None)
        } else {
            let declarations = request.tools.iter().map(declaration_to_json).collect();
            let mode = match request.tool_mode {
                ToolMode::None => "NONE",
                ToolMode::Auto => "AUTO",
                ToolMode::Required => "ANY",
            };
            (
                vec![ToolSet {
                    function_declarations: declarations,
                }],
                Some(ToolConfig {
                    function_calling_config: FunctionCallingConfig { mode },
                }),
            )
        };

        GenerateContentRequest {
            contents,
            tools,
            tool_config,
        }
    }

    fn parse_reply(response: GenerateContentResponse) -> Result<ModelReply, LlmError> {
        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(LlmError::InvalidResponse(format!(
                    "Empty model response: {}",
                    reason
                )));
            }
        };

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall::new(call.name, call.args));
            }
        }

        Ok(ModelReply {
            text: if text.is_empty() { None } else { Some(text) },
            tool_calls,
        })
    }
}

fn message_to_content(message: &Message) -> Content {
    match message {
        Message::User(text) => Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.clone()),
                ..Default::default()
            }],
        },
        Message::Model(reply) => {
            let mut parts = Vec::new();
            if let Some(text) = &reply.text {
                parts.push(Part {
                    text: Some(text.clone()),
                    ..Default::default()
                });
            }
            for call in &reply.tool_calls {
                parts.push(Part {
                    function_call: Some(FunctionCall {
                        name: call.name.clone(),
                        args: call.args.clone(),
                    }),
                    ..Default::default()
                });
            }
            Content {
                role: Some("model".to_string()),
                parts,
            }
        }
        Message::ToolResult { name, response } => Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: name.clone(),
                    response: response.clone(),
                }),
                ..Default::default()
            }],
        },
    }
}

fn declaration_to_json(decl: &ToolDeclaration) -> Value {
    let properties: Map<String, Value> = decl
        .parameters
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                serde_json::json!({ "type": "STRING", "description": p.description }),
            )
        })
        .collect();

    serde_json::json!({
        "name": decl.name,
        "description": decl.description,
        "parameters": {
            "type": "OBJECT",
            "properties": properties,
            "required": decl.required_parameters(),
        }
    })
}

#[async_trait]
impl ChatModel for GeminiModel {
    async fn send(&self, request: ChatRequest<'_>) -> Result<ModelReply, LlmError> {
        let body = Self::build_request(&request);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tool_mode = ?request.tool_mode,
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Communication(format!("Request timed out: {}", e))
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(format!("HTTP {}: {}", status, error_text))
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let reply = Self::parse_reply(parsed)?;
        debug!(
            text_len = reply.text.as_ref().map(|t| t.len()).unwrap_or(0),
            tool_calls = reply.tool_calls.len(),
            "Gemini reply received"
        );
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
