use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use swagger_core::SearchFilter;

use crate::{SwaggerMcp, helpers};

/// Parameters for searching operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchApisParams {
    /// Filter APIs by tag (group name). Exact, case-sensitive match.
    pub tag: Option<String>,
    /// Search keyword in path, summary, description, or operationId.
    pub keyword: Option<String>,
}

/// Parameters for fetching a single operation.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetApiDetailParams {
    /// API path, e.g. /user/v1/account/unbind
    pub path: String,
    /// HTTP method, e.g. put, get, post
    pub method: String,
}

/// Parameters for fetching a component schema.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetSchemaParams {
    /// Schema reference or name, e.g. #/components/schemas/UserSetupParam or UserSetupParam
    #[serde(rename = "ref")]
    pub reference: String,
}

impl From<SearchApisParams> for SearchFilter {
    fn from(params: SearchApisParams) -> Self {
        Self {
            tag: params.tag,
            keyword: params.keyword,
        }
    }
}

#[tool_router(router = tool_router_query, vis = "pub")]
impl SwaggerMcp {
    #[tool(description = "Get all API groups (tags) from the Swagger documentation.")]
    async fn list_api_groups(&self) -> Result<CallToolResult, ErrorData> {
        match self.catalog().list_api_groups().await {
            Ok(groups) => Ok(CallToolResult::success(vec![Content::json(groups)?])),
            Err(err) => Ok(helpers::tool_error("list_api_groups", &err)),
        }
    }

    #[tool(description = "Search for APIs by tag or keyword.")]
    async fn search_apis(
        &self,
        Parameters(params): Parameters<SearchApisParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let filter = SearchFilter::from(params);
        match self.catalog().search_apis(&filter).await {
            Ok(apis) => Ok(CallToolResult::success(vec![Content::json(apis)?])),
            Err(err) => Ok(helpers::tool_error("search_apis", &err)),
        }
    }

    #[tool(description = "Get detailed definition of a specific API.")]
    async fn get_api_detail(
        &self,
        Parameters(params): Parameters<GetApiDetailParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self
            .catalog()
            .get_api_detail(&params.path, &params.method)
            .await
        {
            Ok(operation) => Ok(CallToolResult::success(vec![Content::json(operation)?])),
            Err(err) => Ok(helpers::tool_error("get_api_detail", &err)),
        }
    }

    #[tool(description = "Get schema definition by reference.")]
    async fn get_schema(
        &self,
        Parameters(params): Parameters<GetSchemaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.catalog().get_schema(&params.reference).await {
            Ok(schema) => Ok(CallToolResult::success(vec![Content::json(schema)?])),
            Err(err) => Ok(helpers::tool_error("get_schema", &err)),
        }
    }
}
