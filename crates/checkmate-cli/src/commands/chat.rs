//! Free-form chat with the model.

use crate::error::Result;
use crate::input::{is_exit, LineSource};
use crate::output::Formatter;
use checkmate_llm::{ChatModel, ChatRequest, Message};
use tracing::warn;

/// Converse with `model` until the user exits or input ends.
///
/// No tools are offered. The whole history goes with every turn; a turn
/// that fails is dropped from it so the user can simply retry.
/// Returns the number of answered turns.
pub async fn run_chat(
    model: &dyn ChatModel,
    input: &mut dyn LineSource,
    formatter: &Formatter,
) -> Result<usize> {
    println!("{}", formatter.info("Chat mode - type 'exit' or 'quit' to return"));

    let mut history: Vec<Message> = Vec::new();
    let mut turns = 0;

    while let Some(line) = input.read_line("you> ")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit(line) {
            break;
        }

        history.push(Message::User(line.to_string()));

        match model.send(ChatRequest::plain(&history)).await {
            Ok(reply) => match reply.non_empty_text().map(str::to_string) {
                Some(text) => {
                    println!("{}", formatter.model_reply(&text));
                    history.push(Message::Model(reply));
                    turns += 1;
                }
                None => {
                    history.pop();
                    eprintln!("{}", formatter.warning("The model returned an empty reply"));
                }
            },
            Err(e) => {
                history.pop();
                warn!(error = %e, "Chat turn failed");
                eprintln!("{}", formatter.error(&e.to_string()));
            }
        }
    }

    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::input::ScriptedInput;
    use checkmate_llm::{LlmError, ModelReply, ScriptedModel, ToolMode};

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[tokio::test]
    async fn test_history_grows_across_turns() {
        let model = ScriptedModel::new(vec![
            ModelReply::text("Hello!"),
            ModelReply::text("Paris."),
        ]);
        let mut input = ScriptedInput::new(&["hi", "", "capital of France?", "quit"]);

        let turns = run_chat(&model, &mut input, &formatter()).await.unwrap();

        assert_eq!(turns, 2);
        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].messages, vec![Message::User("hi".into())]);
        assert_eq!(
            requests[1].messages,
            vec![
                Message::User("hi".into()),
                Message::Model(ModelReply::text("Hello!")),
                Message::User("capital of France?".into()),
            ]
        );
        assert!(requests.iter().all(|r| r.tool_names.is_empty()));
        assert!(requests.iter().all(|r| r.tool_mode == ToolMode::None));
    }

    #[tokio::test]
    async fn test_failed_turn_is_dropped() {
        let model = ScriptedModel::new(Vec::new())
            .then_fail(LlmError::RateLimitExceeded)
            .then_reply(ModelReply::text("Back again."));
        let mut input = ScriptedInput::new(&["first try", "second try", "exit"]);

        let turns = run_chat(&model, &mut input, &formatter()).await.unwrap();

        assert_eq!(turns, 1);
        let requests = model.requests();
        assert_eq!(requests[1].messages, vec![Message::User("second try".into())]);
    }

    #[tokio::test]
    async fn test_end_of_input_leaves_chat() {
        let model = ScriptedModel::new(Vec::new());
        let mut input = ScriptedInput::new(&[]);

        assert_eq!(run_chat(&model, &mut input, &formatter()).await.unwrap(), 0);
        assert_eq!(model.call_count(), 0);
    }
}
