//! Prompt templates for Laere.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. Templates use `{{name}}` placeholders filled at render time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub classifier: ClassifierPrompts,
    pub math: MathPrompts,
    pub physics: PhysicsPrompts,
    pub general: GeneralPrompts,
}

/// Prompt for intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPrompts {
    pub user: String,
}

impl Default for ClassifierPrompts {
    fn default() -> Self {
        Self {
            user: r#"Analyze the following student query and classify its primary subject focus.
Return ONLY one of the following category names: 'math', 'physics', or 'general'.

Student Query: "{{query}}"

Category:"#
                .to_string(),
        }
    }
}

/// Prompts for the math responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathPrompts {
    pub system: String,
    pub initial: String,
    pub tool_feedback: String,
}

impl Default for MathPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a math tutor, an expert in mathematics. Your goal is to help students understand and solve math problems.

You have access to a 'calculator' tool. When a query involves an arithmetic calculation you should verify or perform, you MUST request the calculator by outputting a JSON object fenced like this:

```json
{"tool_name": "calculator", "tool_input": "2+2"}
```

Do not perform such calculations yourself; use the tool. Explain concepts clearly and give step-by-step solutions where appropriate. After the tool provides a result, incorporate it naturally into your explanation."#.to_string(),

            initial: r#"Student query: "{{query}}"
Respond helpfully. If a calculation is needed, remember to request the 'calculator' tool using the specified JSON format."#.to_string(),

            tool_feedback: default_tool_feedback(),
        }
    }
}

/// Prompts for the physics responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsPrompts {
    pub system: String,
    pub initial: String,
    pub tool_feedback: String,
}

impl Default for PhysicsPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a physics tutor, an expert in physics. Your goal is to help students understand physics concepts and problems.

You have access to a 'get_physics_constant' tool. When a query requires the value of a specific physical constant, you MUST request it by outputting a JSON object fenced like this:

```json
{"tool_name": "get_physics_constant", "tool_input": "speed of light"}
```

Do not guess constants; use the tool. Explain concepts clearly. After the tool provides data, incorporate it naturally into your explanation."#.to_string(),

            initial: r#"Student query: "{{query}}"
Respond helpfully. If a physical constant is needed, remember to request the 'get_physics_constant' tool using the specified JSON format."#.to_string(),

            tool_feedback: default_tool_feedback(),
        }
    }
}

/// Prompt for the stateless general tutoring path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralPrompts {
    pub user: String,
}

impl Default for GeneralPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are a helpful general-knowledge tutor. The query could not be specifically classified as math or physics, or it is a general question. Answer the following student query to the best of your ability: "{{query}}""#
                .to_string(),
        }
    }
}

fn default_tool_feedback() -> String {
    r#"You used the '{{tool_name}}' tool with input '{{tool_input}}', and it returned: {{tool_result}}

Now formulate a comprehensive, helpful answer to the original student query: "{{query}}". Incorporate the tool's result smoothly into your explanation. Do not emit the JSON tool-request format again."#
        .to_string()
}

impl Prompts {
    /// Load prompts, applying any overrides found in the custom directory.
    ///
    /// Each section is overridden by its own file: `classifier.toml`,
    /// `math.toml`, `physics.toml`, `general.toml`.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let classifier_path = custom_path.join("classifier.toml");
            if classifier_path.exists() {
                let content = std::fs::read_to_string(&classifier_path)?;
                prompts.classifier = toml::from_str(&content)?;
            }

            let math_path = custom_path.join("math.toml");
            if math_path.exists() {
                let content = std::fs::read_to_string(&math_path)?;
                prompts.math = toml::from_str(&content)?;
            }

            let physics_path = custom_path.join("physics.toml");
            if physics_path.exists() {
                let content = std::fs::read_to_string(&physics_path)?;
                prompts.physics = toml::from_str(&content)?;
            }

            let general_path = custom_path.join("general.toml");
            if general_path.exists() {
                let content = std::fs::read_to_string(&general_path)?;
                prompts.general = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }
}

/// Render a prompt template, replacing `{{name}}` placeholders.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts_nonempty() {
        let prompts = Prompts::default();
        assert!(prompts.classifier.user.contains("{{query}}"));
        assert!(prompts.math.system.contains("calculator"));
        assert!(prompts.physics.system.contains("get_physics_constant"));
        assert!(prompts.general.user.contains("{{query}}"));
    }

    #[test]
    fn test_render_template() {
        let rendered = render(
            "Used {{tool_name}} on {{tool_input}}.",
            &[("tool_name", "calculator"), ("tool_input", "2+2")],
        );
        assert_eq!(rendered, "Used calculator on 2+2.");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let rendered = render("{{query}} and {{other}}", &[("query", "hi")]);
        assert_eq!(rendered, "hi and {{other}}");
    }
}
