//! MCP server implementation for swagger-mcp.
//!
//! This crate wires the `OpenAPI` catalog into rmcp tool handlers and exposes
//! the MCP-facing tool and prompt surface.

mod helpers;
mod tools;
pub mod server;

use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::ToolRouter,
    service::RequestContext,
    tool_handler,
};
use rmcp::model::{
    GetPromptRequestParams,
    GetPromptResult,
    Implementation,
    ListPromptsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};
use swagger_core::ApiCatalog;

pub use tools::query::{GetApiDetailParams, GetSchemaParams, SearchApisParams};

const SERVER_INSTRUCTIONS: &str = r"swagger-mcp answers questions about a single OpenAPI/Swagger document.

Workflow:
1. Call `list_api_groups` to see the tag groups the API is organised into.
2. Call `search_apis` with a `tag` (exact group name) and/or a `keyword` (matched case-insensitively
   against path, summary, description, and operationId) to find operations.
3. Call `get_api_detail` with a `path` and `method` to fetch the full operation, including
   path-level parameters followed by operation-level parameters.
4. Call `get_schema` with a `ref` (`#/components/schemas/Name` or just `Name`) to fetch a component
   schema. Nested `$ref` values are returned as-is; fetch them with further calls.

Notes:
- The document is loaded on first use and cached; a failed load is retried on the next call.
- Prompts `api_call_generate` and `typescript_generate` describe how to turn results into code.";

/// MCP server wrapper around the `OpenAPI` catalog and tool routers.
#[derive(Clone)]
pub struct SwaggerMcp {
    tool_router: ToolRouter<Self>,
    catalog: ApiCatalog,
}

impl SwaggerMcp {
    #[must_use]
    pub fn new(catalog: ApiCatalog) -> Self {
        Self {
            tool_router: Self::tool_router_query(),
            catalog,
        }
    }

    pub(crate) const fn catalog(&self) -> &ApiCatalog {
        &self.catalog
    }
}

#[tool_handler]
impl ServerHandler for SwaggerMcp {
    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult::with_all_items(tools::prompts::list())))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, ErrorData>> + Send + '_ {
        std::future::ready(tools::prompts::get(&request.name))
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
