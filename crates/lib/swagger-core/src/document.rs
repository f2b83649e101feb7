//! Loosely typed view of an OpenAPI/Swagger document.
//!
//! Only the sections the queries read are typed: declared `tags`, `paths`
//! and `components.schemas`. Every field is optional, so OpenAPI 3.0, 3.1 and
//! Swagger 2.0 documents all load. Operations and schemas stay raw JSON and
//! are returned exactly as written.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level document sections used by the queries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Option<Components>,
}

/// A tag (API group). Keys other than `name` and `description` are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            extra: Map::new(),
        }
    }
}

/// One entry under `paths`. A path item stored as `$ref` has no operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Option<Vec<Value>>,
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Operation for a method token, ignoring case.
    #[must_use]
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method.to_ascii_lowercase().as_str() {
            "get" => self.get.as_ref(),
            "post" => self.post.as_ref(),
            "put" => self.put.as_ref(),
            "delete" => self.delete.as_ref(),
            "patch" => self.patch.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "trace" => self.trace.as_ref(),
            _ => None,
        }
    }
}

/// A raw operation object. Serializes back to exactly the keys it was read with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operation(Map<String, Value>);

impl Operation {
    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.text("summary")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.text("operationId")
    }

    /// String entries of `tags`, or `None` when the key is absent.
    #[must_use]
    pub fn tags(&self) -> Option<Vec<&str>> {
        self.0
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().is_some_and(|tags| tags.contains(&tag))
    }

    #[must_use]
    pub fn parameters(&self) -> &[Value] {
        self.0
            .get("parameters")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    pub fn set_parameters(&mut self, parameters: Vec<Value>) {
        self.0.insert("parameters".to_string(), Value::Array(parameters));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
}
