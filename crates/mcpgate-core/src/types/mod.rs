//! MCP domain types for tools, resources, prompts, and content.
//!
//! - **Tools**: callable functions with a JSON-Schema-shaped input
//! - **Resources**: URI-addressed data with text or blob payloads
//! - **Prompts**: templated messages with ordered arguments
//! - **Content**: text, image, and embedded-resource blocks
//! - **Arguments**: typed access to a call's argument object

pub mod arguments;
pub mod content;
pub mod prompt;
pub mod resource;
pub mod tool;

pub use arguments::*;
pub use content::*;
pub use prompt::*;
pub use resource::*;
pub use tool::*;
