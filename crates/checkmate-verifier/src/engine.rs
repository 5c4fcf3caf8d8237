//! The verification session state machine

use crate::config::VerifierConfig;
use crate::error::VerifyFault;
use crate::prompt::{search_tool_declaration, PromptBuilder, QUERY_PARAMETER, SEARCH_TOOL_NAME};
use crate::types::{SessionState, VerificationOutcome};
use checkmate_llm::{ChatModel, ChatRequest, Message, ModelReply, ToolCall, ToolDeclaration, ToolMode};
use checkmate_search::SearchTool;
use serde_json::json;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Drives one model conversation per claim
///
/// The model may request the search tool once. A successful search is
/// relayed as `{"result": <payload>}`, a failed one as
/// `{"error": <message>}`; either way the model is then asked for its final
/// answer with tools disabled. Faults never escape [`verify`](Self::verify).
pub struct VerificationEngine<M, S> {
    model: M,
    search: S,
    config: VerifierConfig,
    tools: Vec<ToolDeclaration>,
}

/// Working state of one session
struct Session {
    messages: Vec<Message>,
    source_url: Option<String>,
    searches: usize,
}

impl<M, S> VerificationEngine<M, S>
where
    M: ChatModel,
    S: SearchTool,
{
    /// Create a new engine
    pub fn new(model: M, search: S, config: VerifierConfig) -> Self {
        Self {
            model,
            search,
            config,
            tools: vec![search_tool_declaration()],
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// The underlying chat model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Verify one claim
    pub async fn verify(&self, claim: &str) -> VerificationOutcome {
        info!(model = %self.model.model_name(), "Starting verification");

        let prompt = PromptBuilder::new(claim)
            .with_tool_mode(self.config.tool_mode)
            .build();
        let mut session = Session {
            messages: vec![Message::User(prompt)],
            source_url: None,
            searches: 0,
        };

        let mut state = SessionState::AwaitingModel;
        loop {
            debug!(state = %state, "Session state");
            state = match state {
                SessionState::AwaitingModel => {
                    match self.ask(&session.messages, self.config.tool_mode).await {
                        Ok(reply) => Self::on_first_reply(&mut session, reply),
                        Err(fault) => SessionState::Error(fault),
                    }
                }
                SessionState::ToolExecuting(call) => self.run_tool(&mut session, call).await,
                SessionState::AwaitingFinal => {
                    match self.ask(&session.messages, ToolMode::None).await {
                        Ok(reply) => Self::on_final_reply(reply),
                        Err(fault) => SessionState::Error(fault),
                    }
                }
                SessionState::Completed(text) => {
                    let outcome =
                        VerificationOutcome::from_model_text(&text, session.source_url, session.searches);
                    info!(
                        result = %outcome.result,
                        searches = outcome.searches,
                        "Verification completed"
                    );
                    return outcome;
                }
                SessionState::Error(fault) => {
                    warn!(error = %fault, "Verification failed");
                    return VerificationOutcome::failed(&fault, session.searches);
                }
            };
        }
    }

    /// One model turn under the model timeout
    async fn ask(&self, messages: &[Message], tool_mode: ToolMode) -> Result<ModelReply, VerifyFault> {
        let request = ChatRequest {
            messages,
            tools: &self.tools,
            tool_mode,
        };
        let limit = self.config.model_timeout();

        match timeout(limit, self.model.send(request)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(VerifyFault::Transport(e.to_string())),
            Err(_) => Err(VerifyFault::Timeout {
                operation: "Model request",
                after: limit,
            }),
        }
    }

    fn on_first_reply(session: &mut Session, reply: ModelReply) -> SessionState {
        if let Some(call) = reply.first_tool_call().cloned() {
            if reply.tool_calls.len() > 1 {
                debug!(
                    requested = reply.tool_calls.len(),
                    "Only the first tool call is executed"
                );
            }
            session.messages.push(Message::Model(reply));
            return SessionState::ToolExecuting(call);
        }

        match reply.non_empty_text() {
            Some(text) => SessionState::Completed(text.to_string()),
            None => SessionState::Error(VerifyFault::Protocol(
                "model returned an empty response".to_string(),
            )),
        }
    }

    async fn run_tool(&self, session: &mut Session, call: ToolCall) -> SessionState {
        if call.name != SEARCH_TOOL_NAME {
            return SessionState::Error(VerifyFault::Protocol(format!(
                "model requested unknown tool '{}'",
                call.name
            )));
        }

        let query = match call.string_arg(QUERY_PARAMETER).map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => {
                return SessionState::Error(VerifyFault::Protocol(format!(
                    "tool call is missing the '{}' argument",
                    QUERY_PARAMETER
                )))
            }
        };

        info!(query = %query, "Running search");
        let limit = self.config.search_timeout();
        session.searches += 1;

        let response = match timeout(limit, self.search.search(&query)).await {
            Err(_) => {
                return SessionState::Error(VerifyFault::Timeout {
                    operation: "Search request",
                    after: limit,
                })
            }
            Ok(Ok(results)) => {
                session.source_url = results.first_link().map(str::to_string);
                json!({ "result": results.into_payload() })
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Search failed; relaying error to the model");
                json!({ "error": format!("Error during web search: {}", e) })
            }
        };

        session.messages.push(Message::ToolResult {
            name: call.name,
            response,
        });
        SessionState::AwaitingFinal
    }

    fn on_final_reply(reply: ModelReply) -> SessionState {
        if !reply.tool_calls.is_empty() {
            warn!("Model requested another tool call; using its text as the final answer");
        }

        match reply.non_empty_text() {
            Some(text) => SessionState::Completed(text.to_string()),
            None => SessionState::Error(VerifyFault::Protocol(
                "model returned no final answer".to_string(),
            )),
        }
    }
}
