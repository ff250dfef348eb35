//! Configuration module for Laere.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{
    render, ClassifierPrompts, GeneralPrompts, MathPrompts, PhysicsPrompts, Prompts,
};
pub use settings::{
    GeneralSettings, GenerationSettings, PromptSettings, ServerSettings, Settings,
};
