//! Laere - AI Tutoring Router
//!
//! Routes natural-language student questions to specialist AI responders
//! (math, physics, general). A responder may invoke one narrow tool per
//! turn (an arithmetic evaluator or a physical-constant lookup), requested
//! through a fenced-JSON grammar embedded in the generator's reply, and
//! narrates the tool's result into a single synthesized answer.
//!
//! The name "Laere" comes from the Norwegian word "lære," meaning "to
//! learn" or "to teach."
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `generation` - Generation engine boundary (OpenAI-backed)
//! - `tools` - Pure tool functions and the per-responder registry
//! - `agent` - Responders and the tool-call grammar
//! - `classifier` - Intent classification with a deterministic fallback
//! - `router` - Top-level query routing
//! - `cli` - Command-line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use laere::config::Settings;
//! use laere::router::Router;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut router = Router::from_settings(&settings)?;
//!
//!     let answer = router.route("What is 15 times 4 plus 7?").await;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod router;
pub mod tools;

pub use error::{LaereError, Result};
