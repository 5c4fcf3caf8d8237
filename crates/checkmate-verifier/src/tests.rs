//! Integration tests for the verification engine and check pipeline

#[cfg(test)]
mod tests {
    use crate::{
        CheckError, FactChecker, VerificationEngine, VerifierConfig, VerifyFault, SEARCH_TOOL_NAME,
    };
    use checkmate_domain::{
        CheckStatus, ClaimStore, FactCheckId, FactCheckRecord, Resolution, Verdict,
    };
    use checkmate_llm::{LlmError, Message, ModelReply, ScriptedModel, ToolCall, ToolMode};
    use checkmate_search::StaticSearch;
    use checkmate_store::SqliteStore;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn search_call(query: &str) -> ModelReply {
        ModelReply::tool_call(ToolCall::with_string_arg(SEARCH_TOOL_NAME, "query", query))
    }

    fn nasa_results() -> StaticSearch {
        StaticSearch::returning(json!({
            "organic": [
                {"title": "Earth", "link": "https://www.nasa.gov/earth"},
                {"title": "Shape of Earth", "link": "https://en.wikipedia.org/wiki/Earth"}
            ]
        }))
    }

    fn checker_with(
        model: ScriptedModel,
        search: StaticSearch,
    ) -> FactChecker<ScriptedModel, StaticSearch, SqliteStore> {
        let engine = VerificationEngine::new(model, search, VerifierConfig::default());
        FactChecker::new(engine, Arc::new(SqliteStore::in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_direct_answer_completes() {
        let model = ScriptedModel::new(vec![ModelReply::text(
            "[VERDICT: True] Confirmed by multiple sources.",
        )]);
        let search = nasa_results();
        let checker = checker_with(model.clone(), search.clone());

        let record = checker.check("The Earth is round.").await.unwrap();

        assert_eq!(record.status, CheckStatus::Completed);
        assert_eq!(record.result.as_deref(), Some("true"));
        assert_eq!(record.analysis.as_deref(), Some("Confirmed by multiple sources."));
        assert!(record.source_url.is_none());
        assert_eq!(search.call_count(), 0);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_search_round_trip() {
        let model = ScriptedModel::new(vec![
            search_call("Earth shape scientific consensus"),
            ModelReply::text("[VERDICT: True] NASA and peer-reviewed sources agree."),
        ]);
        let search = nasa_results();
        let checker = checker_with(model.clone(), search.clone());

        let record = checker.check("The Earth is round.").await.unwrap();

        assert_eq!(search.call_count(), 1);
        assert_eq!(search.queries(), vec!["Earth shape scientific consensus"]);
        assert_eq!(record.status, CheckStatus::Completed);
        assert_eq!(record.result.as_deref(), Some("true"));
        assert_eq!(
            record.analysis.as_deref(),
            Some("NASA and peer-reviewed sources agree.")
        );
        assert_eq!(record.source_url.as_deref(), Some("https://www.nasa.gov/earth"));

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tool_mode, ToolMode::Auto);
        assert_eq!(requests[0].tool_names, vec![SEARCH_TOOL_NAME]);
        assert_eq!(requests[1].tool_mode, ToolMode::None);
        match requests[1].messages.last() {
            Some(Message::ToolResult { name, response }) => {
                assert_eq!(name, SEARCH_TOOL_NAME);
                assert_eq!(
                    response["result"]["organic"][0]["link"],
                    "https://www.nasa.gov/earth"
                );
            }
            other => panic!("Expected tool result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_model_transport_fault_is_absorbed() {
        let model = ScriptedModel::failing(LlmError::Communication("connection refused".to_string()));
        let checker = checker_with(model, nasa_results());

        let record = checker.check("The Earth is round.").await.unwrap();

        assert_eq!(record.status, CheckStatus::Error);
        assert_eq!(record.result.as_deref(), Some("error"));
        let analysis = record.analysis.unwrap();
        assert!(analysis.contains("connection refused"), "analysis: {}", analysis);
    }

    #[tokio::test]
    async fn test_second_tool_request_uses_text_as_final() {
        let model = ScriptedModel::new(vec![
            search_call("first query"),
            search_call("second query").with_text("[VERDICT: Partially True] Mostly right."),
        ]);
        let search = nasa_results();
        let checker = checker_with(model.clone(), search.clone());

        let record = checker.check("Some claim").await.unwrap();

        assert_eq!(search.call_count(), 1);
        assert_eq!(model.call_count(), 2);
        assert_eq!(record.status, CheckStatus::Completed);
        assert_eq!(record.result.as_deref(), Some("partially-true"));
        assert_eq!(record.analysis.as_deref(), Some("Mostly right."));
    }

    #[tokio::test]
    async fn test_second_tool_request_without_text_is_error() {
        let model = ScriptedModel::new(vec![search_call("first"), search_call("second")]);
        let engine = VerificationEngine::new(model, nasa_results(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;

        assert!(outcome.is_error());
        assert_eq!(outcome.result, "error");
        assert!(matches!(outcome.fault, Some(VerifyFault::Protocol(_))));
        assert_eq!(outcome.searches, 1);
    }

    #[tokio::test]
    async fn test_search_failure_is_relayed() {
        let model = ScriptedModel::new(vec![
            search_call("anything"),
            ModelReply::text("Search was unavailable, so I cannot tell. [VERDICT: Unclear]"),
        ]);
        let search = StaticSearch::failing("HTTP 503");
        let engine = VerificationEngine::new(model.clone(), search.clone(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;

        assert!(!outcome.is_error());
        assert_eq!(outcome.result, "unclear");
        assert!(outcome.source_url.is_none());
        assert_eq!(search.call_count(), 1);

        let requests = model.requests();
        match requests[1].messages.last() {
            Some(Message::ToolResult { response, .. }) => {
                let error = response["error"].as_str().unwrap();
                assert!(error.starts_with("Error during web search"));
                assert!(error.contains("HTTP 503"));
            }
            other => panic!("Expected tool result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_query_is_protocol_fault() {
        let model = ScriptedModel::new(vec![ModelReply::tool_call(ToolCall::new(
            SEARCH_TOOL_NAME,
            serde_json::Map::new(),
        ))]);
        let search = nasa_results();
        let engine = VerificationEngine::new(model, search.clone(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;

        assert!(matches!(outcome.fault, Some(VerifyFault::Protocol(ref m)) if m.contains("query")));
        assert_eq!(search.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_fault() {
        let model = ScriptedModel::new(vec![ModelReply::tool_call(ToolCall::with_string_arg(
            "open_browser",
            "query",
            "x",
        ))]);
        let engine = VerificationEngine::new(model, nasa_results(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;
        assert!(matches!(outcome.fault, Some(VerifyFault::Protocol(_))));
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let model = ScriptedModel::new(vec![ModelReply::text("   ")]);
        let engine = VerificationEngine::new(model, nasa_results(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;
        assert!(outcome.is_error());
        assert!(outcome.analysis.contains("empty response"));
    }

    #[tokio::test]
    async fn test_answer_without_marker_is_unclear() {
        let text = "I could not find reliable information about this.";
        let model = ScriptedModel::new(vec![ModelReply::text(text)]);
        let engine = VerificationEngine::new(model, nasa_results(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;
        assert_eq!(outcome.result, "unclear");
        assert_eq!(outcome.analysis, text);
        assert_eq!(outcome.verdict(), Some(Verdict::Unclear));
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout() {
        let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: True] late")])
            .with_delay(Duration::from_secs(120));
        let engine = VerificationEngine::new(model, nasa_results(), VerifierConfig::default());

        let outcome = engine.verify("Some claim").await;

        match outcome.fault {
            Some(VerifyFault::Timeout { operation, after }) => {
                assert_eq!(operation, "Model request");
                assert_eq!(after, Duration::from_secs(60));
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dropped_check_still_resolves_record() {
        let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: True] Slow but sure.")])
            .with_delay(Duration::from_millis(300));
        let checker = checker_with(model, nasa_results());

        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), checker.check("The Earth is round."))
                .await;
        assert!(abandoned.is_err(), "check should still be waiting on the model");

        let mut records = Vec::new();
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            records = checker.store().list_recent(10).unwrap();
            if records.iter().all(|r| r.status != CheckStatus::Pending) {
                break;
            }
        }

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, CheckStatus::Completed);
        assert_eq!(records[0].result.as_deref(), Some("true"));
        assert_eq!(records[0].analysis.as_deref(), Some("Slow but sure."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_timeout() {
        let model = ScriptedModel::new(vec![
            search_call("Earth shape"),
            ModelReply::text("[VERDICT: True] never reached"),
        ]);
        let search = nasa_results().with_delay(Duration::from_secs(30));
        let engine = VerificationEngine::new(model.clone(), search.clone(), VerifierConfig::default());

        let outcome = engine.verify("The Earth is round.").await;

        match &outcome.fault {
            Some(VerifyFault::Timeout { operation, after }) => {
                assert_eq!(*operation, "Search request");
                assert_eq!(*after, Duration::from_secs(15));
            }
            other => panic!("Expected search timeout, got {:?}", other),
        }
        assert_eq!(outcome.searches, 1);
        assert_eq!(outcome.result, "error");
        assert!(outcome.source_url.is_none());
        assert_eq!(search.call_count(), 1);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_required_mode_is_sent_first() {
        let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: False] No.")]);
        let engine = VerificationEngine::new(model.clone(), nasa_results(), VerifierConfig::strict());

        engine.verify("Some claim").await;

        let requests = model.requests();
        assert_eq!(requests[0].tool_mode, ToolMode::Required);
        match &requests[0].messages[0] {
            Message::User(prompt) => {
                assert!(prompt.contains("'Some claim'"));
                assert!(prompt.contains("You must call"));
            }
            other => panic!("Expected user prompt, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_misleading_is_stored_as_false() {
        let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: Misleading] Cherry-picked.")]);
        let checker = checker_with(model, nasa_results());

        let record = checker.check("Some claim").await.unwrap();
        assert_eq!(record.result.as_deref(), Some("false"));
        assert_eq!(record.verdict(), Some(Verdict::False));
    }

    #[tokio::test]
    async fn test_blank_claim_rejected_without_record() {
        let model = ScriptedModel::new(Vec::new());
        let checker = checker_with(model.clone(), nasa_results());

        let result = checker.check("   ").await;

        assert!(matches!(result, Err(CheckError::EmptyClaim)));
        assert_eq!(model.call_count(), 0);
        assert!(checker.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_and_recent() {
        let model = ScriptedModel::new(vec![
            ModelReply::text("[VERDICT: True] a"),
            ModelReply::text("[VERDICT: False] b"),
        ]);
        let checker = checker_with(model, nasa_results());

        let first = checker.check("first").await.unwrap();
        let second = checker.check("second").await.unwrap();

        let recent = checker.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second.id);

        let fetched = checker.get(first.id).await.unwrap().unwrap();
        assert_eq!(fetched.claim, "first");
        assert!(checker.get(FactCheckId::from_value(999)).await.unwrap().is_none());
    }

    struct UnavailableStore;

    impl ClaimStore for UnavailableStore {
        type Error = String;

        fn create(&self, _claim: &str) -> Result<FactCheckId, String> {
            Err("database is locked".to_string())
        }

        fn update(&self, _id: FactCheckId, _resolution: &Resolution) -> Result<(), String> {
            Err("database is locked".to_string())
        }

        fn get_by_id(&self, _id: FactCheckId) -> Result<Option<FactCheckRecord>, String> {
            Ok(None)
        }

        fn list_recent(&self, _limit: usize) -> Result<Vec<FactCheckRecord>, String> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_create_failure_skips_verification() {
        let model = ScriptedModel::new(vec![ModelReply::text("[VERDICT: True] x")]);
        let engine = VerificationEngine::new(model.clone(), nasa_results(), VerifierConfig::default());
        let checker = FactChecker::new(engine, Arc::new(UnavailableStore));

        let result = checker.check("Some claim").await;

        match result {
            Err(CheckError::Create(message)) => assert!(message.contains("locked")),
            other => panic!("Expected create failure, got {:?}", other),
        }
        assert_eq!(model.call_count(), 0);
    }
}
