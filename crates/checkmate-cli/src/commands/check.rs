//! Check command implementation.

use crate::app::Checker;
use crate::error::Result;
use crate::output::Formatter;
use checkmate_domain::{CheckStatus, FactCheckRecord};

/// Run the full pipeline on `claim` and print the stored record.
pub async fn execute_check(
    claim: &str,
    checker: &Checker,
    formatter: &Formatter,
) -> Result<FactCheckRecord> {
    let record = checker.check(claim).await?;

    if record.status == CheckStatus::Error {
        eprintln!("{}", formatter.warning("Verification failed; the error was recorded"));
    }
    println!("{}", formatter.format_record(&record)?);

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use checkmate_domain::ClaimStore;
    use checkmate_llm::{ChatModel, LlmError, ModelReply, ScriptedModel, ToolCall};
    use checkmate_search::{SearchTool, StaticSearch};
    use checkmate_store::SqliteStore;
    use checkmate_verifier::{CheckError, FactChecker, VerificationEngine, VerifierConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn checker(model: ScriptedModel, store: Arc<SqliteStore>) -> Checker {
        let model: Arc<dyn ChatModel> = Arc::new(model);
        let search: Arc<dyn SearchTool> = Arc::new(StaticSearch::returning(json!({
            "organic": [{"link": "https://www.nasa.gov/earth"}]
        })));
        FactChecker::new(
            VerificationEngine::new(model, search, VerifierConfig::default()),
            store,
        )
    }

    #[tokio::test]
    async fn test_check_stores_completed_record() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let model = ScriptedModel::new(vec![
            ModelReply::tool_call(ToolCall::with_string_arg(
                "get_search_results",
                "query",
                "Earth shape",
            )),
            ModelReply::text("[VERDICT: True] Observations confirm it."),
        ]);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let record = execute_check("The Earth is round.", &checker(model, store.clone()), &formatter)
            .await
            .unwrap();

        assert_eq!(record.status, CheckStatus::Completed);
        assert_eq!(record.result.as_deref(), Some("true"));
        assert_eq!(record.source_url.as_deref(), Some("https://www.nasa.gov/earth"));
        assert_eq!(store.get_by_id(record.id).unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_check_records_model_failure() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let model = ScriptedModel::failing(LlmError::Communication("connection reset".into()));
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let record = execute_check("Water is dry.", &checker(model, store), &formatter)
            .await
            .unwrap();

        assert_eq!(record.status, CheckStatus::Error);
        assert_eq!(record.result.as_deref(), Some("error"));
    }

    #[tokio::test]
    async fn test_blank_claim_creates_nothing() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let model = ScriptedModel::new(Vec::new());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_check("   ", &checker(model.clone(), store.clone()), &formatter).await;

        assert!(matches!(result, Err(CliError::Check(CheckError::EmptyClaim))));
        assert!(store.list_recent(10).unwrap().is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
