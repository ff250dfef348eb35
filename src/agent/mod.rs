//! Role-scoped conversational agents with a one-tool-per-turn protocol.
//!
//! A responder wraps the generation engine with a fixed role instruction
//! and a small set of tools. Within a single turn it may honor at most one
//! tool request, embedded in the generator's reply as a fenced JSON object.

mod grammar;
mod responder;

pub use grammar::{parse_reply, Reply};
pub use responder::{Responder, ResponderPrompts};

pub(crate) use responder::GENERATION_APOLOGY;
