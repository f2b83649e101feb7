//! Fetching and parsing of `OpenAPI` documents from a URL or file path.
//!
//! The loader only depends on [`ParseFn`]; [`SourceParser`] is the default
//! implementation backed by `reqwest` and `serde_yaml`. Text is read into a
//! `serde_json::Value` first and then projected onto [`OpenApiDocument`], so
//! `$ref` entries and unknown keys are kept exactly as written.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::document::OpenApiDocument;

pub type ParseFuture = BoxFuture<'static, Result<OpenApiDocument, SourceError>>;
pub type ParseFn = Arc<dyn Fn(String) -> ParseFuture + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid document location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    #[error("failed to fetch document from '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("failed to read document file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OpenAPI document from '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("document from '{location}' has an unexpected shape: {source}")]
    Shape {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(Url),
    File(PathBuf),
}

impl SourceLocation {
    /// Classifies a raw location string.
    ///
    /// # Errors
    /// Returns [`SourceError::InvalidLocation`] for malformed URLs or `file://`
    /// URLs that do not map to a local path.
    pub fn parse(location: &str) -> Result<Self, SourceError> {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|err| invalid(location, err))?;
            Ok(Self::Url(url))
        } else if location.starts_with("file://") {
            let url = Url::parse(location).map_err(|err| invalid(location, err))?;
            let path = url
                .to_file_path()
                .map_err(|()| invalid(location, "cannot convert file URL to a path"))?;
            Ok(Self::File(path))
        } else {
            Ok(Self::File(PathBuf::from(location)))
        }
    }
}

fn invalid(location: &str, message: impl std::fmt::Display) -> SourceError {
    SourceError::InvalidLocation {
        location: location.to_string(),
        message: message.to_string(),
    }
}

/// Default document parser: HTTP(S) fetch or file read, then YAML/JSON parse.
#[derive(Debug, Clone, Default)]
pub struct SourceParser {
    client: Client,
}

impl SourceParser {
    /// Reads the raw document text for `location`.
    ///
    /// # Errors
    /// Returns a [`SourceError`] when the location is invalid, the request
    /// fails or returns a non-success status, or the file cannot be read.
    pub async fn fetch(&self, location: &str) -> Result<String, SourceError> {
        match SourceLocation::parse(location)? {
            SourceLocation::Url(url) => {
                tracing::info!(%url, "fetching OpenAPI document");
                let fetch_err = |err: reqwest::Error| SourceError::Fetch {
                    url: url.to_string(),
                    message: err.to_string(),
                };
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(fetch_err)?
                    .error_for_status()
                    .map_err(fetch_err)?;
                response.text().await.map_err(fetch_err)
            }
            SourceLocation::File(path) => {
                tracing::info!(path = %path.display(), "reading OpenAPI document");
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| SourceError::ReadFile {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }

    /// Fetches and parses the document at `location`.
    ///
    /// # Errors
    /// Propagates fetch failures and the errors of [`parse_document`].
    pub async fn parse(&self, location: &str) -> Result<OpenApiDocument, SourceError> {
        let text = self.fetch(location).await?;
        parse_document(location, &text)
    }

    /// Wraps this parser as a [`ParseFn`] for the document loader.
    #[must_use]
    pub fn into_parse_fn(self) -> ParseFn {
        let parser = Arc::new(self);
        Arc::new(move |location: String| -> ParseFuture {
            let parser = parser.clone();
            Box::pin(async move { parser.parse(&location).await })
        })
    }
}

/// Parses document text. JSON is a subset of YAML, so one parser covers both.
///
/// # Errors
/// Returns [`SourceError::Parse`] for text that is not YAML or JSON and
/// [`SourceError::Shape`] when `tags`, `paths` or `components` are malformed.
pub fn parse_document(location: &str, text: &str) -> Result<OpenApiDocument, SourceError> {
    let raw: Value = serde_yaml::from_str(text).map_err(|source| SourceError::Parse {
        location: location.to_string(),
        source,
    })?;
    serde_json::from_value(raw).map_err(|source| SourceError::Shape {
        location: location.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_locations() {
        assert!(matches!(
            SourceLocation::parse("https://example.com/v3/api-docs").unwrap(),
            SourceLocation::Url(_)
        ));
        assert_eq!(
            SourceLocation::parse("./openapi.yaml").unwrap(),
            SourceLocation::File(PathBuf::from("./openapi.yaml"))
        );
        assert!(matches!(
            SourceLocation::parse("http://exa mple.com"),
            Err(SourceError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn parses_json_and_yaml() {
        let yaml = "openapi: 3.0.0\ntags:\n  - name: a\npaths: {}\n";
        let json = r#"{"openapi":"3.0.0","tags":[{"name":"a"}]}"#;
        for document in [parse_document("a.yaml", yaml), parse_document("a.json", json)] {
            let document = document.unwrap();
            assert_eq!(document.tags.unwrap()[0].name, "a");
            assert!(document.paths.is_empty());
        }
    }

    #[test]
    fn accepts_openapi_31_and_swagger_2() {
        let v31 = r"
openapi: 3.1.0
info: {title: t, version: '1'}
paths:
  /users:
    get:
      responses:
        200:
          description: ok
components:
  schemas:
    User:
      type: object
      properties:
        nickname:
          type: [string, 'null']
        kind:
          const: person
";
        let document = parse_document("v31.yaml", v31).unwrap();
        let user = &document.components.unwrap().schemas["User"];
        assert_eq!(user["properties"]["nickname"]["type"], serde_json::json!(["string", "null"]));
        assert_eq!(user["properties"]["kind"]["const"], "person");

        let v2 = r#"{"swagger":"2.0","paths":{"/pets":{"get":{"tags":["pets"]}}}}"#;
        let document = parse_document("v2.json", v2).unwrap();
        assert!(document.paths["/pets"].get.as_ref().unwrap().has_tag("pets"));
    }

    #[test]
    fn malformed_sections_are_shape_errors() {
        let err = parse_document("bad.yaml", "tags: nope\n").unwrap_err();
        assert!(matches!(err, SourceError::Shape { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn parse_error_names_location() {
        let err = parse_document("broken.yaml", "openapi: [").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let err = SourceParser::default()
            .parse("/definitely/not/here.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::ReadFile { .. }));
    }
}
