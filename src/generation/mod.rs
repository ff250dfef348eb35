//! Generation engine boundary.
//!
//! Everything above this module treats text generation as an opaque,
//! fallible call: some context goes in, text (or a refusal) comes out.
//! The context for each call is passed explicitly (an optional standing
//! instruction plus exactly the turns the engine should see), so a caller
//! that needs an isolated exchange passes an empty slice rather than
//! mutating and restoring shared history.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation context.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Outcome of a generation call that reached the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// A normal text reply.
    Text(String),
    /// The engine declined to answer; carries the stated reason.
    ///
    /// This is a benign outcome, not an error: callers turn it into a
    /// user-facing message instead of failing the turn.
    Blocked(String),
}

/// Trait for text generation engines.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply for the given instruction and conversation turns.
    async fn generate(&self, instruction: Option<&str>, turns: &[Turn]) -> Result<Generation>;
}

#[cfg(test)]
pub mod testing {
    //! A scripted generator for exercising the routing and tool protocol
    //! without touching the network.

    use super::{Generation, Generator, Role, Turn};
    use crate::error::{LaereError, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One call captured by [`ScriptedGenerator`].
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub instruction: Option<String>,
        pub turns: Vec<Turn>,
    }

    impl RecordedCall {
        /// Number of turns the engine was shown for this call.
        pub fn context_len(&self) -> usize {
            self.turns.len()
        }

        /// Content of the last user turn, if any.
        pub fn last_user_content(&self) -> Option<&str> {
            self.turns
                .iter()
                .rev()
                .find(|t| t.role == Role::User)
                .map(|t| t.content.as_str())
        }
    }

    /// Replays a fixed script of outcomes and records every call.
    pub struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<Generation>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedGenerator {
        pub fn new(outcomes: Vec<Result<Generation>>) -> Self {
            Self {
                script: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Convenience constructor: every outcome is a plain text reply.
        pub fn replying(texts: &[&str]) -> Self {
            Self::new(
                texts
                    .iter()
                    .map(|t| Ok(Generation::Text(t.to_string())))
                    .collect(),
            )
        }

        /// All calls made so far, in order.
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(
            &self,
            instruction: Option<&str>,
            turns: &[Turn],
        ) -> Result<Generation> {
            self.calls.lock().unwrap().push(RecordedCall {
                instruction: instruction.map(|s| s.to_string()),
                turns: turns.to_vec(),
            });
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LaereError::Generation("script exhausted".to_string())))
        }
    }
}
