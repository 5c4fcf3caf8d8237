//! Fact-check records and their lifecycle

use crate::verdict::Verdict;
use std::fmt;
use std::str::FromStr;

/// Result token stored on records whose verification session failed
pub const ERROR_RESULT: &str = "error";

/// Store-assigned identifier of a fact-check record
///
/// Identifiers are positive integers handed out by the store on creation
/// and never reused or changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactCheckId(i64);

impl FactCheckId {
    /// Wrap a raw identifier value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw identifier value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FactCheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FactCheckId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid fact-check id '{}': {}", s, e))
    }
}

/// Lifecycle status of a fact-check record
///
/// `Pending` is the only initial state. A record leaves it exactly once,
/// for either `Completed` or `Error`, and never comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    /// Verification has not finished yet
    Pending,
    /// The engine produced a verdict
    Completed,
    /// The verification session ended in a fault
    Error,
}

impl CheckStatus {
    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pending => "pending",
            CheckStatus::Completed => "completed",
            CheckStatus::Error => "error",
        }
    }

    /// Whether this status ends the lifecycle
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CheckStatus::Pending)
    }

    /// Whether a record in this status may move to `next`
    pub fn can_transition_to(&self, next: CheckStatus) -> bool {
        matches!(self, CheckStatus::Pending) && next.is_terminal()
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CheckStatus::Pending),
            "completed" => Ok(CheckStatus::Completed),
            "error" => Ok(CheckStatus::Error),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// A submitted claim and its verification outcome
#[derive(Debug, Clone, PartialEq)]
pub struct FactCheckRecord {
    /// Store-assigned identifier
    pub id: FactCheckId,

    /// The statement as submitted
    pub claim: String,

    /// Current lifecycle status
    pub status: CheckStatus,

    /// Canonical verdict token, or `"error"`; unset while pending
    pub result: Option<String>,

    /// Citation captured during verification, if any
    pub source_url: Option<String>,

    /// Engine analysis text; unset while pending
    pub analysis: Option<String>,

    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,

    /// Time of the last mutation (milliseconds since Unix epoch)
    pub updated_at: u64,
}

impl FactCheckRecord {
    /// Canonical verdict of a completed record
    ///
    /// Returns `None` while pending and for failed sessions.
    pub fn verdict(&self) -> Option<Verdict> {
        match self.status {
            CheckStatus::Completed => self.result.as_deref().map(Verdict::from_token),
            _ => None,
        }
    }
}

/// Terminal write applied to a pending record
///
/// Status, result and analysis always travel together so the store can
/// write them in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Terminal status to move to
    pub status: CheckStatus,

    /// Canonical verdict token or [`ERROR_RESULT`]
    pub result: String,

    /// Analysis or fault description
    pub analysis: String,

    /// Optional citation
    pub source_url: Option<String>,
}

impl Resolution {
    /// Resolution for a session that produced a verdict
    pub fn completed(verdict: Verdict, analysis: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Completed,
            result: verdict.as_str().to_string(),
            analysis: analysis.into(),
            source_url: None,
        }
    }

    /// Resolution for a session that ended in a fault
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            result: ERROR_RESULT.to_string(),
            analysis: message.into(),
            source_url: None,
        }
    }

    /// Attach a citation
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}
