//! MCP tool and prompt modules.
//!
//! Query tools answer questions about the loaded `OpenAPI` document; prompts
//! hand the client short workflow guides built on top of those tools.

pub mod prompts;
pub mod query;
