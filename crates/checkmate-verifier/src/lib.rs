//! Checkmate Verifier
//!
//! Claim verification: a short tool-augmented conversation with a chat
//! model, verdict extraction from its answer, and the record lifecycle
//! around it.
//!
//! # Architecture
//!
//! ```text
//! claim → ClaimStore.create (pending)
//!       → VerificationEngine: model ⇄ search (at most one round-trip)
//!       → parse_verdict → Verdict::from_token
//!       → ClaimStore.update (completed | error)
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use checkmate_llm::{ModelReply, ScriptedModel};
//! use checkmate_search::StaticSearch;
//! use checkmate_store::SqliteStore;
//! use checkmate_verifier::{FactChecker, VerificationEngine, VerifierConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: True] Yes.")]);
//! let search = StaticSearch::returning(serde_json::json!({"organic": []}));
//! let engine = VerificationEngine::new(model, search, VerifierConfig::default());
//!
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let checker = FactChecker::new(engine, store);
//!
//! let record = checker.check("The Earth is round.").await?;
//! println!("{}: {:?}", record.id, record.result);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod checker;
mod config;
mod engine;
mod error;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use checker::FactChecker;
pub use config::VerifierConfig;
pub use engine::VerificationEngine;
pub use error::{CheckError, VerifyFault};
pub use parser::{parse_verdict, ParsedVerdict, UNCLEAR_TOKEN};
pub use prompt::{search_tool_declaration, PromptBuilder, QUERY_PARAMETER, SEARCH_TOOL_NAME};
pub use types::{SessionState, VerificationOutcome};
