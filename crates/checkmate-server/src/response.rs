//! JSON bodies returned by the HTTP API

use checkmate_domain::{CheckStatus, FactCheckRecord, ERROR_RESULT};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum characters of analysis shown in a summary
pub const SUMMARY_MAX_CHARS: usize = 500;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r#"https?://[^\s<>"'()\[\]]+"#).expect("url pattern");
}

/// Result of `GET /api/check-claims`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResponse {
    /// Record id
    pub id: i64,
    /// Claim as stored
    pub claim: String,
    /// Canonical verdict, or "error"
    pub verdict: String,
    /// 0-100, 0 for failed checks
    pub credibility_score: u8,
    /// Analysis, truncated
    pub summary: String,
    /// Citation and URLs mentioned in the analysis
    pub sources: Vec<String>,
    /// Time of the terminal write (ms since epoch)
    pub checked_at: u64,
    /// Record status
    pub status: String,
}

impl FactCheckResponse {
    /// Format a record for the API
    pub fn from_record(record: &FactCheckRecord) -> Self {
        let (verdict, credibility_score) = match record.status {
            CheckStatus::Error => (ERROR_RESULT.to_string(), 0),
            _ => match record.verdict() {
                Some(v) => (v.as_str().to_string(), v.credibility_score()),
                None => ("unclear".to_string(), 50),
            },
        };
        let analysis = record.analysis.as_deref().unwrap_or_default();

        Self {
            id: record.id.value(),
            claim: record.claim.clone(),
            verdict,
            credibility_score,
            summary: summarize(analysis),
            sources: extract_sources(record.source_url.as_deref(), analysis),
            checked_at: record.updated_at,
            status: record.status.as_str().to_string(),
        }
    }
}

/// Full record, as returned by `GET /api/fact-check/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Record id
    pub id: i64,
    /// Claim as stored
    pub claim: String,
    /// pending | completed | error
    pub status: String,
    /// Canonical verdict or "error"
    pub result: Option<String>,
    /// Citation
    pub source_url: Option<String>,
    /// Analysis text
    pub analysis: Option<String>,
    /// Creation time (ms since epoch)
    pub created_at: u64,
    /// Last update (ms since epoch)
    pub updated_at: u64,
}

impl From<&FactCheckRecord> for RecordResponse {
    fn from(record: &FactCheckRecord) -> Self {
        Self {
            id: record.id.value(),
            claim: record.claim.clone(),
            status: record.status.as_str().to_string(),
            result: record.result.clone(),
            source_url: record.source_url.clone(),
            analysis: record.analysis.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers
    pub status: String,
    /// Server time (ms since epoch)
    pub timestamp: u64,
    /// Storage backend
    pub database: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Truncate analysis to [`SUMMARY_MAX_CHARS`] characters, marking the cut
pub fn summarize(analysis: &str) -> String {
    match analysis.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &analysis[..cut]),
        None => analysis.to_string(),
    }
}

/// Citation first, then distinct URLs mentioned in the analysis
pub fn extract_sources(source_url: Option<&str>, analysis: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    let candidates = source_url.into_iter().chain(
        URL_PATTERN
            .find_iter(analysis)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?'])),
    );
    for url in candidates {
        if !sources.iter().any(|s| s == url) {
            sources.push(url.to_string());
        }
    }
    sources
}
