//! Prompt and tool declaration for claim verification

use checkmate_llm::{ToolDeclaration, ToolMode, ToolParameter};

/// Name of the search tool declared to the model
pub const SEARCH_TOOL_NAME: &str = "get_search_results";

/// Name of the search tool's only parameter
pub const QUERY_PARAMETER: &str = "query";

/// The single tool a verification session declares
pub fn search_tool_declaration() -> ToolDeclaration {
    ToolDeclaration {
        name: SEARCH_TOOL_NAME.to_string(),
        description: "Gets real-time search results for verifying a statement.".to_string(),
        parameters: vec![ToolParameter {
            name: QUERY_PARAMETER.to_string(),
            description: "Web search query that would confirm or refute the statement"
                .to_string(),
            required: true,
        }],
    }
}

/// Builds the opening prompt of a verification session
pub struct PromptBuilder {
    claim: String,
    tool_mode: ToolMode,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            tool_mode: ToolMode::Auto,
        }
    }

    /// Adjust the search instruction to the tool mode
    pub fn with_tool_mode(mut self, tool_mode: ToolMode) -> Self {
        self.tool_mode = tool_mode;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Please fact-check this statement: '{}'.\n",
            self.claim.trim()
        ));

        match self.tool_mode {
            ToolMode::Required => prompt.push_str(&format!(
                "You must call the {} tool to find evidence before answering.\n",
                SEARCH_TOOL_NAME
            )),
            _ => prompt.push_str(&format!(
                "Use the {} tool to find evidence when current information would help.\n",
                SEARCH_TOOL_NAME
            )),
        }

        prompt.push('\n');
        prompt.push_str(VERDICT_INSTRUCTIONS);
        prompt
    }
}

const VERDICT_INSTRUCTIONS: &str = r#"Start your final answer with the verdict in exactly this format:
[VERDICT: <value>]
where <value> is one of: True, False, Partially True, Misleading, Unclear.

After the verdict, give a brief analysis that summarizes the findings and cites sources."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_states_claim_and_marker() {
        let prompt = PromptBuilder::new("  The Earth is round.  ").build();
        assert!(prompt.contains("'The Earth is round.'"));
        assert!(prompt.contains("[VERDICT: <value>]"));
        assert!(prompt.contains("Partially True"));
        assert!(prompt.contains(SEARCH_TOOL_NAME));
    }

    #[test]
    fn test_required_mode_demands_search() {
        let prompt = PromptBuilder::new("x")
            .with_tool_mode(ToolMode::Required)
            .build();
        assert!(prompt.contains("You must call"));

        let optional = PromptBuilder::new("x").build();
        assert!(!optional.contains("You must call"));
    }

    #[test]
    fn test_search_tool_declaration() {
        let decl = search_tool_declaration();
        assert_eq!(decl.name, "get_search_results");
        assert!(decl.description.contains("real-time search results"));
        assert_eq!(decl.required_parameters(), vec!["query"]);
    }
}
