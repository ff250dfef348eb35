//! Responder: a role-scoped agent implementing the tool-call protocol.

use super::grammar::{parse_reply, Reply};
use crate::config::render;
use crate::generation::{Generation, Generator, Turn};
use crate::tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Apology returned when the generation engine fails outright.
pub(crate) const GENERATION_APOLOGY: &str =
    "Sorry, I encountered an error while trying to generate a response.";

/// Prompt templates a responder renders per turn.
#[derive(Debug, Clone)]
pub struct ResponderPrompts {
    /// Standing role instruction, fixed at construction.
    pub instruction: String,
    /// Template for the opening prompt of a turn (`{{query}}`).
    pub initial: String,
    /// Template for the post-tool re-prompt (`{{tool_name}}`,
    /// `{{tool_input}}`, `{{tool_result}}`, `{{query}}`).
    pub tool_feedback: String,
}

/// A role-scoped conversational agent that may request at most one tool
/// invocation per turn.
///
/// The transcript is owned exclusively by this responder and mutated only
/// here; the router clears it at the start of every top-level query so no
/// context leaks between independent questions.
pub struct Responder {
    name: &'static str,
    prompts: ResponderPrompts,
    tools: ToolRegistry,
    generator: Arc<dyn Generator>,
    transcript: Vec<Turn>,
}

impl Responder {
    /// Create a responder with a role, its prompts and its tool subset.
    pub fn new(
        name: &'static str,
        prompts: ResponderPrompts,
        tools: ToolRegistry,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            name,
            prompts,
            tools,
            generator,
            transcript: Vec::new(),
        }
    }

    /// The responder's role name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The transcript accumulated since the last reset.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Clear the conversation transcript.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Answer a student query.
    ///
    /// Total: every failure mode degrades to a textual answer. Engine
    /// errors become apologies, a broken tool fence falls back to the text
    /// before it, and tool errors are narrated by the generator.
    pub async fn answer(&mut self, query: &str) -> String {
        info!("[{}] received query: {}", self.name, query);

        let initial = render(&self.prompts.initial, &[("query", query)]);

        let raw = match self.exchange(&initial).await {
            Ok(text) => text,
            Err(message) => return message,
        };

        match parse_reply(&raw) {
            Reply::Plain(text) => text,
            Reply::Malformed { preamble } => {
                debug!(
                    "[{}] tool fence did not parse; falling back to preamble",
                    self.name
                );
                preamble
            }
            Reply::ToolRequest {
                name,
                input,
                preamble,
            } => {
                self.handle_tool_request(query, &name, &input, &preamble)
                    .await
            }
        }
    }

    /// Honor a recognized tool request: validate it, run the tool, then
    /// re-prompt the generator to narrate the result.
    async fn handle_tool_request(
        &mut self,
        query: &str,
        name: &str,
        input: &str,
        preamble: &str,
    ) -> String {
        let Some(tool) = self.tools.get(name) else {
            info!("[{}] generator requested unknown tool '{}'", self.name, name);
            return format!(
                "I considered using a tool named '{}', but no matching tool was found. My response so far: {}",
                name, preamble
            );
        };

        if input.trim().is_empty() {
            return format!("I tried to use the '{}' tool, but its input was missing.", name);
        }

        info!("[{}] invoking tool '{}' with input: {}", self.name, name, input);
        let result = tool(input);
        debug!("[{}] tool '{}' returned: {}", self.name, name, result);

        let feedback = render(
            &self.prompts.tool_feedback,
            &[
                ("tool_name", name),
                ("tool_input", input),
                ("tool_result", &result),
                ("query", query),
            ],
        );

        // The re-prompt runs against an explicitly empty context: the
        // standing transcript neither leaks into nor absorbs this exchange.
        match self.generate(&[Turn::user(feedback)]).await {
            Ok(text) => text,
            Err(message) => message,
        }
    }

    /// Run one generation call against the standing transcript and record
    /// both sides of the exchange on success.
    async fn exchange(&mut self, prompt: &str) -> Result<String, String> {
        let mut turns = self.transcript.clone();
        turns.push(Turn::user(prompt));

        let text = self.generate(&turns).await?;

        self.transcript.push(Turn::user(prompt));
        self.transcript.push(Turn::assistant(text.clone()));
        Ok(text)
    }

    /// Call the engine, mapping every failure to user-facing text.
    async fn generate(&self, turns: &[Turn]) -> Result<String, String> {
        match self
            .generator
            .generate(Some(&self.prompts.instruction), turns)
            .await
        {
            Ok(Generation::Text(text)) => Ok(text),
            Ok(Generation::Blocked(reason)) => {
                warn!("[{}] response blocked: {}", self.name, reason);
                Err(format!("Sorry, my response was blocked. Reason: {}", reason))
            }
            Err(e) => {
                warn!("[{}] generation failed: {}", self.name, e);
                Err(GENERATION_APOLOGY.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::error::LaereError;
    use crate::generation::testing::ScriptedGenerator;

    const TOOL_REPLY: &str = "Let me verify that.\n```json\n{\"tool_name\": \"calculator\", \"tool_input\": \"15*4+7\"}\n```";

    fn math_responder(generator: Arc<ScriptedGenerator>) -> Responder {
        let prompts = Prompts::default();
        Responder::new(
            "math",
            ResponderPrompts {
                instruction: prompts.math.system.clone(),
                initial: prompts.math.initial.clone(),
                tool_feedback: prompts.math.tool_feedback.clone(),
            },
            ToolRegistry::math(),
            generator,
        )
    }

    #[tokio::test]
    async fn test_plain_reply_is_final_answer() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "The Pythagorean theorem relates the sides of a right triangle.",
        ]));
        let mut responder = math_responder(generator.clone());

        let answer = responder.answer("Explain the Pythagorean theorem.").await;
        assert_eq!(
            answer,
            "The Pythagorean theorem relates the sides of a right triangle."
        );
        assert_eq!(generator.calls().len(), 1);
        assert_eq!(responder.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_turn_runs_two_phases() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            TOOL_REPLY,
            "15 times 4 plus 7 equals 67.",
        ]));
        let mut responder = math_responder(generator.clone());

        let answer = responder.answer("What is 15 times 4 plus 7?").await;
        assert_eq!(answer, "15 times 4 plus 7 equals 67.");

        let calls = generator.calls();
        assert_eq!(calls.len(), 2);
        // The follow-up carries the tool result in its prompt.
        let feedback = calls[1].last_user_content().unwrap();
        assert!(feedback.contains("calculator"));
        assert!(feedback.contains("67"));
    }

    #[tokio::test]
    async fn test_tool_followup_context_is_isolated() {
        let generator = Arc::new(ScriptedGenerator::replying(&[TOOL_REPLY, "Done: 67."]));
        let mut responder = math_responder(generator.clone());

        responder.answer("What is 15 times 4 plus 7?").await;

        let calls = generator.calls();
        // First call: just the initial prompt. Second call: just the
        // feedback prompt; the standing transcript is not passed in.
        assert_eq!(calls[0].context_len(), 1);
        assert_eq!(calls[1].context_len(), 1);
        // And the isolated exchange is not recorded on the transcript.
        assert_eq!(responder.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_falls_back_to_preamble() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "Checking the web.\n```json\n{\"tool_name\": \"web_search\", \"tool_input\": \"q\"}\n```",
        ]));
        let mut responder = math_responder(generator.clone());

        let answer = responder.answer("Look this up for me.").await;
        assert!(answer.contains("web_search"));
        assert!(answer.contains("no matching tool"));
        assert!(answer.contains("Checking the web."));
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_input_short_circuits() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "```json\n{\"tool_name\": \"calculator\", \"tool_input\": \"\"}\n```",
        ]));
        let mut responder = math_responder(generator.clone());

        let answer = responder.answer("Compute something.").await;
        assert!(answer.contains("input was missing"));
        // Neither the tool nor the generator is contacted again.
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_fence_falls_back_to_preamble() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "Here is my partial answer.\n```json\n{oops}\n```",
        ]));
        let mut responder = math_responder(generator);

        let answer = responder.answer("A question.").await;
        assert_eq!(answer, "Here is my partial answer.");
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_apology() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(LaereError::Generation(
            "connection refused".to_string(),
        ))]));
        let mut responder = math_responder(generator);

        let answer = responder.answer("A question.").await;
        assert_eq!(answer, GENERATION_APOLOGY);
    }

    #[tokio::test]
    async fn test_blocked_reply_names_the_reason() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(Generation::Blocked(
            "safety".to_string(),
        ))]));
        let mut responder = math_responder(generator);

        let answer = responder.answer("A question.").await;
        assert!(answer.contains("blocked"));
        assert!(answer.contains("safety"));
    }

    #[tokio::test]
    async fn test_reset_clears_transcript_after_tool_turn() {
        let generator = Arc::new(ScriptedGenerator::replying(&[TOOL_REPLY, "67."]));
        let mut responder = math_responder(generator);

        responder.answer("What is 15 times 4 plus 7?").await;
        assert!(!responder.transcript().is_empty());

        responder.reset();
        assert!(responder.transcript().is_empty());
    }
}
