//! Read-only queries over a loaded [`ApiDocument`].

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::document::{Operation, Tag};
use crate::loader::ApiDocument;

/// Operation slots of a path item, in scan order.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// Prefix stripped from full schema references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Description given to tags gathered from operations rather than declared.
pub const DERIVED_TAG_DESCRIPTION: &str = "Collected from paths";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Method {method} not found for path {path}")]
    MethodNotFound { path: String, method: String },

    #[error("Schema not found: {reference} (searched for {name})")]
    SchemaNotFound { reference: String, name: String },
}

/// Optional filters for [`search_apis`]; both must match when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub tag: Option<String>,
    pub keyword: Option<String>,
}

impl SearchFilter {
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

/// One search hit: a single method on a single path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub path: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Every defined `(path, method, operation)` in document order.
fn operations(document: &ApiDocument) -> impl Iterator<Item = (&str, &'static str, &Operation)> {
    document.paths().iter().flat_map(|(path, item)| {
        HTTP_METHODS.iter().filter_map(move |method| {
            item.operation(method)
                .map(|operation| (path.as_str(), *method, operation))
        })
    })
}

/// Declared tags, or tags gathered from operations when none are declared.
#[must_use]
pub fn list_api_groups(document: &ApiDocument) -> Vec<Tag> {
    if !document.tags().is_empty() {
        return document.tags().to_vec();
    }

    let mut names: IndexSet<&str> = IndexSet::new();
    for (_, _, operation) in operations(document) {
        names.extend(operation.tags().unwrap_or_default());
    }

    names
        .into_iter()
        .map(|name| Tag::new(name, DERIVED_TAG_DESCRIPTION))
        .collect()
}

/// Operations matching `filter`, in path-then-method order.
///
/// The tag filter is an exact, case-sensitive match; the keyword filter is a
/// case-insensitive substring match over path, summary, description and
/// operation id. Empty filter values are ignored.
#[must_use]
pub fn search_apis(document: &ApiDocument, filter: &SearchFilter) -> Vec<ApiSummary> {
    let tag = filter.tag.as_deref().filter(|tag| !tag.is_empty());
    let keyword = filter
        .keyword
        .as_deref()
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_lowercase);

    operations(document)
        .filter(|(_, _, operation)| tag.is_none_or(|tag| operation.has_tag(tag)))
        .filter(|(path, _, operation)| {
            keyword
                .as_deref()
                .is_none_or(|keyword| search_text(path, operation).contains(keyword))
        })
        .map(|(path, method, operation)| ApiSummary {
            path: path.to_string(),
            method: method.to_string(),
            summary: operation.summary().map(str::to_string),
            description: operation.description().map(str::to_string),
            operation_id: operation.operation_id().map(str::to_string),
            tags: operation
                .tags()
                .map(|tags| tags.into_iter().map(str::to_string).collect()),
        })
        .collect()
}

fn search_text(path: &str, operation: &Operation) -> String {
    [
        Some(path),
        operation.summary(),
        operation.description(),
        operation.operation_id(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Full operation for `path` + `method`, as stored.
///
/// When the path item declares `parameters`, the result's `parameters` is
/// the path-level list followed by the operation's own. Same-named
/// parameters from both levels are all kept.
///
/// # Errors
/// Returns [`QueryError::PathNotFound`] or [`QueryError::MethodNotFound`].
pub fn get_api_detail(
    document: &ApiDocument,
    path: &str,
    method: &str,
) -> Result<Operation, QueryError> {
    let item = document
        .path_item(path)
        .ok_or_else(|| QueryError::PathNotFound {
            path: path.to_string(),
        })?;
    let operation = item
        .operation(method)
        .ok_or_else(|| QueryError::MethodNotFound {
            path: path.to_string(),
            method: method.to_string(),
        })?;

    let mut merged = operation.clone();
    if let Some(shared) = &item.parameters {
        let parameters = shared
            .iter()
            .chain(operation.parameters())
            .cloned()
            .collect();
        merged.set_parameters(parameters);
    }
    Ok(merged)
}

/// Bare schema name for either `Name` or `#/components/schemas/Name`.
#[must_use]
pub fn schema_name(reference: &str) -> &str {
    reference
        .strip_prefix(SCHEMA_REF_PREFIX)
        .unwrap_or(reference)
}

/// Schema entry as stored; a stored `$ref` is returned without following it.
///
/// # Errors
/// Returns [`QueryError::SchemaNotFound`] naming both the input and the
/// resolved name.
pub fn get_schema(document: &ApiDocument, reference: &str) -> Result<Value, QueryError> {
    let name = schema_name(reference);
    document
        .schemas()
        .and_then(|schemas| schemas.get(name))
        .cloned()
        .ok_or_else(|| QueryError::SchemaNotFound {
            reference: reference.to_string(),
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_document;

    const DOC: &str = r"
openapi: 3.0.3
info:
  title: Accounts
  version: '1.0'
paths:
  /user/v1/account/unbind:
    parameters:
      - name: p1
        in: header
        schema:
          type: string
    put:
      tags: [Users]
      summary: Detach account
      operationId: detachAccount
      parameters:
        - name: p2
          in: query
          schema:
            type: string
        - name: p1
          in: query
          schema:
            type: string
      responses:
        '200':
          description: ok
    get:
      tags: [users, Accounts]
      summary: Check binding
      responses:
        '200':
          description: ok
  /user/v1/profile:
    post:
      tags: [Users]
      summary: Unbind profile
      description: Removes the link
      responses:
        '200':
          description: ok
    delete:
      responses:
        '204':
          description: gone
  /shared:
    $ref: '#/components/pathItems/Shared'
components:
  schemas:
    User:
      type: object
      properties:
        id:
          type: string
    UserAlias:
      $ref: '#/components/schemas/User'
";

    fn document(text: &str) -> ApiDocument {
        ApiDocument::new(parse_document("test.yaml", text).expect("fixture parses"))
    }

    fn parameter_names(operation: &Operation) -> Vec<&str> {
        operation
            .parameters()
            .iter()
            .filter_map(|param| param["name"].as_str())
            .collect()
    }

    #[test]
    fn derives_groups_in_first_seen_order() {
        let groups = list_api_groups(&document(DOC));
        let names: Vec<_> = groups.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, ["users", "Accounts", "Users"]);
        assert!(
            groups
                .iter()
                .all(|tag| tag.description.as_deref() == Some(DERIVED_TAG_DESCRIPTION))
        );
    }

    #[test]
    fn declared_groups_are_returned_unmodified() {
        let text = DOC.replace(
            "paths:\n",
            "tags:\n  - name: Zeta\n    description: Last\n  - name: Alpha\npaths:\n",
        );
        let groups = list_api_groups(&document(&text));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Zeta");
        assert_eq!(groups[0].description.as_deref(), Some("Last"));
        assert_eq!(groups[1].name, "Alpha");
        assert!(groups[1].description.is_none());
    }

    #[test]
    fn unfiltered_search_lists_every_operation_in_scan_order() {
        let hits = search_apis(&document(DOC), &SearchFilter::default());
        let keys: Vec<_> = hits
            .iter()
            .map(|hit| (hit.path.as_str(), hit.method.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("/user/v1/account/unbind", "get"),
                ("/user/v1/account/unbind", "put"),
                ("/user/v1/profile", "post"),
                ("/user/v1/profile", "delete"),
            ]
        );
    }

    #[test]
    fn tag_filter_is_exact_and_case_sensitive() {
        let hits = search_apis(&document(DOC), &SearchFilter::default().with_tag("Users"));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| {
            hit.tags
                .as_ref()
                .is_some_and(|tags| tags.iter().any(|tag| tag == "Users"))
        }));

        let hits = search_apis(&document(DOC), &SearchFilter::default().with_tag("User"));
        assert!(hits.is_empty());
    }

    #[test]
    fn keyword_matches_path_or_text_ignoring_case() {
        let hits = search_apis(&document(DOC), &SearchFilter::default().with_keyword("UNBIND"));
        let keys: Vec<_> = hits
            .iter()
            .map(|hit| (hit.path.as_str(), hit.method.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("/user/v1/account/unbind", "get"),
                ("/user/v1/account/unbind", "put"),
                ("/user/v1/profile", "post"),
            ]
        );

        let filter = SearchFilter::default().with_keyword("detachaccount");
        let hits = search_apis(&document(DOC), &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].operation_id.as_deref(), Some("detachAccount"));
    }

    #[test]
    fn both_filters_must_match() {
        let filter = SearchFilter::default().with_tag("Users").with_keyword("profile");
        let hits = search_apis(&document(DOC), &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].method, "post");
    }

    #[test]
    fn empty_filters_are_ignored() {
        let filter = SearchFilter::default().with_tag("").with_keyword("");
        assert_eq!(search_apis(&document(DOC), &filter).len(), 4);
    }

    #[test]
    fn summary_serializes_camel_case_and_omits_absent_fields() {
        let hits = search_apis(&document(DOC), &SearchFilter::default());
        let put = serde_json::to_value(&hits[1]).unwrap();
        assert_eq!(put["operationId"], "detachAccount");
        let delete = serde_json::to_value(&hits[3]).unwrap();
        assert_eq!(delete, serde_json::json!({"path": "/user/v1/profile", "method": "delete"}));
    }

    #[test]
    fn detail_merges_path_parameters_first_without_dedup() {
        let doc = document(DOC);
        let operation = get_api_detail(&doc, "/user/v1/account/unbind", "PUT").unwrap();
        assert_eq!(parameter_names(&operation), ["p1", "p2", "p1"]);
        assert_eq!(operation.operation_id(), Some("detachAccount"));

        let get = get_api_detail(&doc, "/user/v1/account/unbind", "get").unwrap();
        assert_eq!(parameter_names(&get), ["p1"]);
    }

    #[test]
    fn detail_method_lookup_ignores_case() {
        let doc = document(DOC);
        let upper = get_api_detail(&doc, "/user/v1/profile", "POST").unwrap();
        let lower = get_api_detail(&doc, "/user/v1/profile", "post").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn detail_reports_missing_path_and_method() {
        let doc = document(DOC);
        let err = get_api_detail(&doc, "/nope", "get").unwrap_err();
        assert!(err.to_string().contains("/nope"));

        let err = get_api_detail(&doc, "/user/v1/profile", "PATCH").unwrap_err();
        assert_eq!(
            err,
            QueryError::MethodNotFound {
                path: "/user/v1/profile".to_string(),
                method: "PATCH".to_string(),
            }
        );
        assert!(err.to_string().contains("PATCH"));

        let err = get_api_detail(&doc, "/shared", "get").unwrap_err();
        assert!(matches!(err, QueryError::MethodNotFound { .. }));
    }

    #[test]
    fn schema_lookup_accepts_name_or_reference() {
        let doc = document(DOC);
        let by_ref = get_schema(&doc, "#/components/schemas/User").unwrap();
        let by_name = get_schema(&doc, "User").unwrap();
        assert_eq!(by_ref, by_name);
        assert_eq!(by_name["properties"]["id"]["type"], "string");
    }

    #[test]
    fn schema_reference_entries_are_not_followed() {
        let alias = get_schema(&document(DOC), "UserAlias").unwrap();
        assert_eq!(alias, serde_json::json!({"$ref": "#/components/schemas/User"}));
    }

    #[test]
    fn missing_schema_names_input_and_lookup() {
        let err = get_schema(&document(DOC), "#/components/schemas/Missing").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("#/components/schemas/Missing"));
        assert!(message.contains("(searched for Missing)"));

        let err = get_schema(&document(DOC), "Missing").unwrap_err();
        assert_eq!(err.to_string(), "Schema not found: Missing (searched for Missing)");
    }

    const PASSTHROUGH: &str = r"
openapi: 3.1.0
paths:
  /items:
    parameters: []
    post:
      tags: []
      x-rate-limit: 10
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Item'
      responses:
        200:
          description: ok
components:
  schemas:
    Item:
      type: object
      properties:
        kind:
          const: item
        note:
          type: [string, 'null']
";

    #[test]
    fn empty_tag_list_is_reported_as_empty() {
        let hits = search_apis(&document(PASSTHROUGH), &SearchFilter::default());
        let hit = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(hit, serde_json::json!({"path": "/items", "method": "post", "tags": []}));
        assert!(list_api_groups(&document(PASSTHROUGH)).is_empty());
    }

    #[test]
    fn detail_keeps_every_stored_key() {
        let operation = get_api_detail(&document(PASSTHROUGH), "/items", "post").unwrap();
        let value = serde_json::to_value(&operation).unwrap();
        assert_eq!(value["x-rate-limit"], 10);
        assert_eq!(value["parameters"], serde_json::json!([]));
        assert_eq!(
            value["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Item"
        );
        assert_eq!(value["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn schema_keeps_json_schema_keywords() {
        let item = get_schema(&document(PASSTHROUGH), "Item").unwrap();
        assert_eq!(item["properties"]["kind"], serde_json::json!({"const": "item"}));
        assert_eq!(item["properties"]["note"]["type"], serde_json::json!(["string", "null"]));
    }
}
