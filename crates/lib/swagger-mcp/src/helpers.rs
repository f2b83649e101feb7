use rmcp::model::{CallToolResult, Content};
use swagger_core::CatalogError;

/// Converts a catalog failure into an error-flagged tool result.
pub fn tool_error(tool: &str, err: &CatalogError) -> CallToolResult {
    match err {
        CatalogError::Load(_) => tracing::warn!(tool, error = %err, "tool call failed"),
        CatalogError::Query(_) => tracing::debug!(tool, error = %err, "tool lookup missed"),
    }
    CallToolResult::error(vec![Content::text(err.to_string())])
}
