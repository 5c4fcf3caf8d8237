//! Types for verification sessions

use crate::error::VerifyFault;
use crate::parser::parse_verdict;
use checkmate_domain::{Resolution, Verdict, ERROR_RESULT};
use checkmate_llm::ToolCall;
use std::fmt;

/// Outcome of one verification session
///
/// `result` is the raw token from the verdict marker (lower-cased), or
/// `"error"` when the session failed. Canonicalization happens when the
/// outcome is turned into a [`Resolution`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    /// Parsed verdict token or `"error"`
    pub result: String,

    /// Analysis text, or the fault description
    pub analysis: String,

    /// First organic link of a successful search
    pub source_url: Option<String>,

    /// Searches performed (0 or 1)
    pub searches: usize,

    /// Fault that ended the session, if any
    pub fault: Option<VerifyFault>,
}

impl VerificationOutcome {
    /// Outcome for final model text
    pub fn from_model_text(text: &str, source_url: Option<String>, searches: usize) -> Self {
        let parsed = parse_verdict(text);
        Self {
            result: parsed.result,
            analysis: parsed.analysis,
            source_url,
            searches,
            fault: None,
        }
    }

    /// Outcome for a failed session
    pub fn failed(fault: &VerifyFault, searches: usize) -> Self {
        Self {
            result: ERROR_RESULT.to_string(),
            analysis: format!("An error occurred: {}", fault),
            source_url: None,
            searches,
            fault: Some(fault.clone()),
        }
    }

    /// Whether the session ended in the error state
    pub fn is_error(&self) -> bool {
        self.fault.is_some()
    }

    /// Canonical verdict, unless the session failed
    pub fn verdict(&self) -> Option<Verdict> {
        if self.is_error() {
            None
        } else {
            Some(Verdict::from_token(&self.result))
        }
    }

    /// Terminal write for the record this session verified
    pub fn to_resolution(&self) -> Resolution {
        match self.verdict() {
            None => Resolution::failed(self.analysis.clone()),
            Some(verdict) => {
                let resolution = Resolution::completed(verdict, self.analysis.clone());
                match &self.source_url {
                    Some(url) => resolution.with_source_url(url.clone()),
                    None => resolution,
                }
            }
        }
    }
}

/// State of a verification session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for the model's first reply
    AwaitingModel,
    /// Running the requested tool
    ToolExecuting(ToolCall),
    /// Waiting for the model's answer after the tool result
    AwaitingFinal,
    /// Final model text received
    Completed(String),
    /// The session failed
    Error(VerifyFault),
}

impl SessionState {
    /// Whether the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed(_) | SessionState::Error(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::AwaitingModel => "awaiting_model",
            SessionState::ToolExecuting(_) => "tool_executing",
            SessionState::AwaitingFinal => "awaiting_final",
            SessionState::Completed(_) => "completed",
            SessionState::Error(_) => "error",
        };
        write!(f, "{}", name)
    }
}
