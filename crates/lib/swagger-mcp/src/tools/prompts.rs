//! Workflow guides exposed as MCP prompts.

use rmcp::ErrorData;
use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};

pub const API_CALL_GENERATE: &str = "api_call_generate";
pub const TYPESCRIPT_GENERATE: &str = "typescript_generate";

const API_CALL_GENERATE_DESCRIPTION: &str = "Returns a short guide for generating TypeScript API calls (fetch or axios) from the current OpenAPI/Swagger document. Use get_api_detail to inspect an operation, then follow the guide to build the example.";

const TYPESCRIPT_GENERATE_DESCRIPTION: &str = "Returns a short guide for generating TypeScript type definitions from the current OpenAPI/Swagger document. Use get_schema to fetch a schema, then follow the guide to generate the corresponding types.";

const API_CALL_GENERATE_GUIDE: &str = r"## Generating API Call Examples from OpenAPI/Swagger

Follow these steps to produce TypeScript API call examples (e.g. `fetch` or `axios`) for endpoints in the current document:

1. **Find the API that matches the user's description**
   - **Prefer the chat context:** If the conversation already provides a `path` and `method` (e.g. from a previous `search_apis` or `get_api_detail` result, or from the user's message), use those and skip loading the full list.
   - **If the context does not identify the API:** Call `search_apis` with a keyword or path fragment from the user's description to narrow results. Only call `search_apis` **without parameters** if you still cannot find a match, then pick the operation that matches what the user described (by path, method, summary, or tags).
   - **If no API matches**, **stop and do not generate an example.** Tell the user that the described API was not found.
   - Once you have a matching `path` and `method`, call `get_api_detail` with them to get the full operation (parameters, requestBody, responses).

2. **Handle TypeScript definitions when needed**
   - If the project uses TypeScript, generate the type definitions the example needs.
   - If the user already has type definitions, **prefer the user-defined types**.
   - If the user-defined types look incorrect or inconsistent, **ask a follow-up question** before generating or using types.

3. **Emit the example**
   - Use the operation returned by `get_api_detail` as the reference. Prefer the project's existing API call style when present; otherwise use an idiomatic style (e.g. fetch or axios).";

const TYPESCRIPT_GENERATE_GUIDE: &str = r"## Deriving TypeScript Types from OpenAPI/Swagger Schemas

Follow these steps to obtain schema definitions from the current document and map them to TypeScript types:

1. **Resolve the schema reference**
   - When inspecting an operation with `get_api_detail`, `$ref` values in `requestBody`, `parameters`, or response schemas point to component schemas (e.g. `#/components/schemas/UserSetupParam`).
   - You can also call `get_schema` with a known schema name (e.g. `UserSetupParam`) to inspect the raw schema.

2. **Fetch the schema**
   - Call `get_schema` with `ref` set to either the full reference `#/components/schemas/XXX` or the schema name `XXX`.
   - The tool returns the schema as JSON (including `properties`, `type`, `required`, etc.). Nested `$ref` values are not expanded; fetch them with further `get_schema` calls.

3. **Emit TypeScript types**
   - Draft `interface` or `type` declarations that reflect the schema structure.
   - For `$ref`, use the referenced schema name as the type name, or resolve it via `get_schema` and inline the definition.

**Note:** If the repository already contains a type definition that matches the target schema (same name or equivalent shape), reuse it instead of generating a duplicate.";

/// All prompts advertised by the server.
#[must_use]
pub fn list() -> Vec<Prompt> {
    vec![
        Prompt::new(
            API_CALL_GENERATE,
            Some(API_CALL_GENERATE_DESCRIPTION),
            None,
        ),
        Prompt::new(
            TYPESCRIPT_GENERATE,
            Some(TYPESCRIPT_GENERATE_DESCRIPTION),
            None,
        ),
    ]
}

/// Renders a prompt by name.
///
/// # Errors
/// Returns an invalid-params error for unknown prompt names.
pub fn get(name: &str) -> Result<GetPromptResult, ErrorData> {
    let (description, guide) = match name {
        API_CALL_GENERATE => (API_CALL_GENERATE_DESCRIPTION, API_CALL_GENERATE_GUIDE),
        TYPESCRIPT_GENERATE => (TYPESCRIPT_GENERATE_DESCRIPTION, TYPESCRIPT_GENERATE_GUIDE),
        other => {
            return Err(ErrorData::invalid_params(
                format!("unknown prompt: {other}"),
                None,
            ));
        }
    };

    Ok(GetPromptResult {
        description: Some(description.to_string()),
        messages: vec![PromptMessage::new_text(PromptMessageRole::Assistant, guide)],
    })
}
