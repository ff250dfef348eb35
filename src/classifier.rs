//! Intent classification with a deterministic fallback.

use crate::config::render;
use crate::generation::{Generation, Generator, Turn};
use std::sync::Arc;
use tracing::{debug, warn};

/// Routing category for a student query.
///
/// Produced fresh per query and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Math,
    Physics,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Math => write!(f, "math"),
            Category::Physics => write!(f, "physics"),
            Category::General => write!(f, "general"),
        }
    }
}

const MATH_KEYWORDS: &[&str] = &[
    "math",
    "algebra",
    "calculate",
    "equation",
    "solve",
    "number",
    "geometry",
    "integral",
    "derivative",
];

const PHYSICS_KEYWORDS: &[&str] = &[
    "physics",
    "force",
    "energy",
    "motion",
    "gravity",
    "light",
    "thermodynamics",
    "relativity",
    "quantum",
];

/// Maps a raw query to a routing category.
///
/// The primary path asks the generation engine for a single-word label; if
/// that call fails, is blocked, or replies with neither known label, the
/// keyword fallback runs on the original query. A query matching neither
/// label nor any keyword collapses to [`Category::General`].
pub struct Classifier {
    generator: Arc<dyn Generator>,
    prompt: String,
}

impl Classifier {
    /// Create a classifier using the given engine and prompt template.
    pub fn new(generator: Arc<dyn Generator>, prompt: &str) -> Self {
        Self {
            generator,
            prompt: prompt.to_string(),
        }
    }

    /// Classify a query. Total: never fails upward.
    pub async fn classify(&self, query: &str) -> Category {
        let prompt = render(&self.prompt, &[("query", query)]);

        match self.generator.generate(None, &[Turn::user(prompt)]).await {
            Ok(Generation::Text(reply)) => {
                let label = reply.trim().to_lowercase();
                debug!("classifier replied '{}' for query: {}", label, query);
                if label.contains("math") {
                    Category::Math
                } else if label.contains("physics") {
                    Category::Physics
                } else {
                    classify_fallback(query)
                }
            }
            Ok(Generation::Blocked(reason)) => {
                warn!("classifier reply blocked ({}); using keyword fallback", reason);
                classify_fallback(query)
            }
            Err(e) => {
                warn!("classifier call failed ({}); using keyword fallback", e);
                classify_fallback(query)
            }
        }
    }
}

/// Keyword-based fallback classification.
///
/// Pure and total: the same query always yields the same category,
/// independent of any network or model state. Math keywords are checked
/// before physics keywords.
pub fn classify_fallback(query: &str) -> Category {
    let query = query.to_lowercase();

    if MATH_KEYWORDS.iter().any(|kw| query.contains(kw)) {
        return Category::Math;
    }
    if PHYSICS_KEYWORDS.iter().any(|kw| query.contains(kw)) {
        return Category::Physics;
    }
    Category::General
}
