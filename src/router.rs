//! Query routing across the specialist responders.

use crate::agent::{Responder, ResponderPrompts, GENERATION_APOLOGY};
use crate::classifier::{Category, Classifier};
use crate::config::{render, Prompts, Settings};
use crate::generation::{Generation, Generator, OpenAIGenerator, Turn};
use crate::tools::ToolRegistry;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Routes each student query to the right specialist and returns a single
/// synthesized answer.
///
/// Constructed once at process start and reused for the process lifetime.
/// `route` takes `&mut self` because transcript reset-and-use must not
/// interleave with another in-flight query on the same router; a hosting
/// layer that serves queries concurrently gives each session its own
/// router or serializes access with a mutex.
pub struct Router {
    classifier: Classifier,
    math: Responder,
    physics: Responder,
    general_prompt: String,
    generator: Arc<dyn Generator>,
}

impl Router {
    /// Build the router, its classifier and both specialist responders.
    ///
    /// The classifier may use a different (typically smaller) engine than
    /// the responders.
    pub fn new(
        generator: Arc<dyn Generator>,
        classifier_generator: Arc<dyn Generator>,
        prompts: &Prompts,
    ) -> Self {
        let math = Responder::new(
            "math",
            ResponderPrompts {
                instruction: prompts.math.system.clone(),
                initial: prompts.math.initial.clone(),
                tool_feedback: prompts.math.tool_feedback.clone(),
            },
            ToolRegistry::math(),
            generator.clone(),
        );

        let physics = Responder::new(
            "physics",
            ResponderPrompts {
                instruction: prompts.physics.system.clone(),
                initial: prompts.physics.initial.clone(),
                tool_feedback: prompts.physics.tool_feedback.clone(),
            },
            ToolRegistry::physics(),
            generator.clone(),
        );

        let classifier = Classifier::new(classifier_generator, &prompts.classifier.user);

        Self {
            classifier,
            math,
            physics,
            general_prompt: prompts.general.user.clone(),
            generator,
        }
    }

    /// Build a router wired to the OpenAI engine described by settings.
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let generator = Arc::new(
            OpenAIGenerator::new(&settings.generation.model)
                .with_temperature(settings.generation.temperature),
        );
        let classifier_generator =
            Arc::new(OpenAIGenerator::new(&settings.generation.classifier_model));

        Ok(Self::new(generator, classifier_generator, &prompts))
    }

    /// Route a query and return the chosen path's answer untouched.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn route(&mut self, query: &str) -> String {
        // Unconditional reset: no context may leak between independent
        // queries routed through this long-lived router.
        self.math.reset();
        self.physics.reset();

        let category = self.classifier.classify(query).await;
        info!("classified query as {}", category);

        match category {
            Category::Math => self.math.answer(query).await,
            Category::Physics => self.physics.answer(query).await,
            Category::General => self.answer_general(query).await,
        }
    }

    /// The general path: one stateless call with a generic tutoring
    /// instruction. No tool protocol, no transcript.
    async fn answer_general(&self, query: &str) -> String {
        let prompt = render(&self.general_prompt, &[("query", query)]);

        match self.generator.generate(None, &[Turn::user(prompt)]).await {
            Ok(Generation::Text(text)) => text,
            Ok(Generation::Blocked(reason)) => {
                warn!("general reply blocked: {}", reason);
                format!("Sorry, my response was blocked. Reason: {}", reason)
            }
            Err(e) => {
                warn!("general generation failed: {}", e);
                GENERATION_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::ScriptedGenerator;

    const CALC_REPLY: &str = "I'll use the calculator.\n```json\n{\"tool_name\": \"calculator\", \"tool_input\": \"15*4+7\"}\n```";

    fn router_with(generator: Arc<ScriptedGenerator>) -> Router {
        Router::new(generator.clone(), generator, &Prompts::default())
    }

    #[tokio::test]
    async fn test_end_to_end_math_tool_turn() {
        // Script: classifier label, responder tool request, final answer.
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "math",
            CALC_REPLY,
            "15 times 4 is 60, plus 7 gives 67.",
        ]));
        let mut router = router_with(generator.clone());

        let answer = router.route("What is 15 times 4 plus 7?").await;
        assert!(answer.contains("67"));

        let calls = generator.calls();
        assert_eq!(calls.len(), 3);
        // Classifier runs without a standing instruction.
        assert!(calls[0].instruction.is_none());
        // The responder's follow-up prompt carries the tool result.
        assert!(calls[2].last_user_content().unwrap().contains("67"));
    }

    #[tokio::test]
    async fn test_physics_queries_reach_physics_responder() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "physics",
            "Gravity pulls masses together.",
        ]));
        let mut router = router_with(generator.clone());

        let answer = router.route("What is gravity?").await;
        assert_eq!(answer, "Gravity pulls masses together.");
        assert_eq!(router.physics.transcript().len(), 2);
        assert!(router.math.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_general_path_is_stateless() {
        let generator = Arc::new(ScriptedGenerator::replying(&[
            "chemistry",
            "Here's a joke about atoms.",
        ]));
        let mut router = router_with(generator.clone());

        let answer = router.route("tell me a joke").await;
        assert_eq!(answer, "Here's a joke about atoms.");
        // No responder transcript is touched on the general path.
        assert!(router.math.transcript().is_empty());
        assert!(router.physics.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_keywords() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(crate::error::LaereError::Generation("down".to_string())),
            Ok(Generation::Text("Physics answer.".to_string())),
        ]));
        let mut router = router_with(generator);

        let answer = router.route("what is gravity").await;
        assert_eq!(answer, "Physics answer.");
    }

    #[tokio::test]
    async fn test_reset_leaves_no_trace_of_prior_tool_turn() {
        // A router that served a tool-using math turn first...
        let generator_a = Arc::new(ScriptedGenerator::replying(&[
            "math",
            CALC_REPLY,
            "It is 67.",
            "math",
            "Algebra balances equations.",
        ]));
        let mut router_a = router_with(generator_a);
        router_a.route("What is 15 times 4 plus 7?").await;
        let answer_a = router_a.route("Explain algebra.").await;

        // ...behaves identically to one that never saw the tool turn.
        let generator_b = Arc::new(ScriptedGenerator::replying(&[
            "math",
            "Algebra balances equations.",
        ]));
        let mut router_b = router_with(generator_b);
        let answer_b = router_b.route("Explain algebra.").await;

        assert_eq!(answer_a, answer_b);
        assert_eq!(
            router_a.math.transcript(),
            router_b.math.transcript()
        );
    }
}
