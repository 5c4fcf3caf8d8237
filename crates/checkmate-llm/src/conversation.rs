//! Provider-neutral conversation model
//!
//! A verification session is a short list of messages: the user prompt,
//! model replies (text and/or tool calls) and tool results fed back to the
//! model. Adapters translate this into their provider's wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Name of the requested tool
    pub name: String,
    /// Arguments as a JSON object
    pub args: Map<String, Value>,
}

impl ToolCall {
    /// Create a tool call
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Tool call carrying a single string argument
    pub fn with_string_arg(
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut args = Map::new();
        args.insert(key.into(), Value::String(value.into()));
        Self::new(name, args)
    }

    /// Look up a string argument
    pub fn string_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }
}

/// One model turn
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelReply {
    /// Text content, if the model produced any
    pub text: Option<String>,
    /// Tool invocations, in the order the model listed them
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    /// A reply with only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A reply with a single tool call and no text
    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            text: None,
            tool_calls: vec![call],
        }
    }

    /// Add text to a reply
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// First requested tool call
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }

    /// Text content, if non-blank
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Whether the reply carries neither text nor a tool call
    pub fn is_empty(&self) -> bool {
        self.non_empty_text().is_none() && self.tool_calls.is_empty()
    }
}

/// A message in the conversation history
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Prompt text from the user side
    User(String),
    /// A previous model turn
    Model(ModelReply),
    /// Result of a tool invocation, relayed back to the model
    ToolResult {
        /// Tool that produced the result
        name: String,
        /// Result payload (opaque JSON)
        response: Value,
    },
}

/// A string parameter of a declared tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Whether the model must supply it
    pub required: bool,
}

/// A function the model may call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    /// Tool name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// String parameters
    pub parameters: Vec<ToolParameter>,
}

impl ToolDeclaration {
    /// Names of required parameters
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Whether and how the model may call declared tools on a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Tools are disabled for this turn
    None,
    /// The model decides whether to call a tool
    #[default]
    Auto,
    /// The model must call a tool
    Required,
}

/// A request for the next model turn
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    /// Conversation so far, oldest first
    pub messages: &'a [Message],
    /// Tools the model may call
    pub tools: &'a [ToolDeclaration],
    /// Tool calling mode for this turn
    pub tool_mode: ToolMode,
}

impl<'a> ChatRequest<'a> {
    /// A request without tools
    pub fn plain(messages: &'a [Message]) -> Self {
        Self {
            messages,
            tools: &[],
            tool_mode: ToolMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_arg_lookup() {
        let call = ToolCall::with_string_arg("get_search_results", "query", "earth shape");
        assert_eq!(call.string_arg("query"), Some("earth shape"));
        assert_eq!(call.string_arg("missing"), None);

        let mut args = Map::new();
        args.insert("query".to_string(), Value::from(42));
        let numeric = ToolCall::new("get_search_results", args);
        assert_eq!(numeric.string_arg("query"), None);
    }

    #[test]
    fn test_reply_emptiness() {
        assert!(ModelReply::default().is_empty());
        assert!(ModelReply::text("   ").is_empty());
        assert!(!ModelReply::text("answer").is_empty());

        let call = ToolCall::with_string_arg("t", "q", "v");
        let reply = ModelReply::tool_call(call.clone());
        assert!(!reply.is_empty());
        assert_eq!(reply.first_tool_call(), Some(&call));
        assert_eq!(reply.non_empty_text(), None);
    }

    #[test]
    fn test_required_parameters() {
        let decl = ToolDeclaration {
            name: "t".to_string(),
            description: "d".to_string(),
            parameters: vec![
                ToolParameter {
                    name: "query".to_string(),
                    description: "q".to_string(),
                    required: true,
                },
                ToolParameter {
                    name: "region".to_string(),
                    description: "r".to_string(),
                    required: false,
                },
            ],
        };
        assert_eq!(decl.required_parameters(), vec!["query"]);
    }

    #[test]
    fn test_tool_mode_serde() {
        let mode: ToolMode = serde_json::from_str("\"required\"").unwrap();
        assert_eq!(mode, ToolMode::Required);
        assert_eq!(serde_json::to_string(&ToolMode::Auto).unwrap(), "\"auto\"");
    }
}
