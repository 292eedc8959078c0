//! Prompt templates and their rendered form.
//!
//! A prompt handler returns plain text. `prompts/get` always answers with
//! exactly one user-role message holding that text, next to the description
//! the prompt was registered with.

use super::content::{Content, Role};
use serde::{Deserialize, Serialize};

/// Entry in `prompts/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Lookup key for `prompts/get`.
    pub name: String,
    /// Echoed back in every rendered result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared arguments, listed in the order they were added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

impl Prompt {
    /// Prompt with no description or arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append an argument declaration.
    #[must_use]
    pub fn argument(mut self, arg: PromptArgument) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Append a required argument.
    #[must_use]
    pub fn required_arg(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.argument(PromptArgument::required(name, description))
    }

    /// Append an optional argument.
    #[must_use]
    pub fn optional_arg(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.argument(PromptArgument::optional(name, description))
    }
}

/// Declared prompt argument.
///
/// Declarations are advisory: handlers receive whatever map the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Key in the `arguments` map.
    pub name: String,
    /// Shown to clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Advertised as required.
    #[serde(default)]
    pub required: bool,
}

impl PromptArgument {
    /// A required declaration.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            required: true,
        }
    }

    /// An optional declaration.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            required: false,
        }
    }
}

/// One message of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Speaker.
    pub role: Role,
    /// Body block.
    pub content: Content,
}

impl PromptMessage {
    /// User message holding a text block.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::text(text),
        }
    }
}

/// Body of a successful `prompts/get` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// Copied from the registered [`Prompt`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always one user message when built by [`GetPromptResult::rendered`].
    pub messages: Vec<PromptMessage>,
}

impl GetPromptResult {
    /// Wrap a rendered string as a single user message.
    #[must_use]
    pub fn rendered(description: Option<String>, text: impl Into<String>) -> Self {
        Self {
            description,
            messages: vec![PromptMessage::user(text)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_arguments_keep_order() {
        let prompt = Prompt::new("review")
            .description("Review code")
            .required_arg("code", "The code")
            .optional_arg("style", "Style guide");

        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(
            json["arguments"],
            json!([
                {"name": "code", "description": "The code", "required": true},
                {"name": "style", "description": "Style guide", "required": false}
            ])
        );
    }

    #[test]
    fn test_prompt_without_arguments() {
        let json = serde_json::to_value(Prompt::new("hello")).unwrap();
        assert!(json.get("arguments").is_none());
    }

    #[test]
    fn test_rendered_result() {
        let result = GetPromptResult::rendered(Some("Say hi".to_string()), "Hi Bob");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "description": "Say hi",
                "messages": [{"role": "user", "content": {"type": "text", "text": "Hi Bob"}}]
            })
        );
    }
}
