use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::document::{OpenApiDocument, PathItem, Tag};
use crate::source::{ParseFn, SourceError, SourceParser};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a Swagger/OpenAPI document URL or path must be provided")]
    MissingSource,
}

#[derive(Debug, Error)]
#[error("failed to load OpenAPI document from '{source_location}': {source}")]
pub struct LoadError {
    pub source_location: String,
    #[source]
    pub source: SourceError,
}

/// Shared, immutable view of a parsed document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    inner: Arc<OpenApiDocument>,
}

impl ApiDocument {
    #[must_use]
    pub fn new(document: OpenApiDocument) -> Self {
        Self {
            inner: Arc::new(document),
        }
    }

    /// Declared tags; empty when the section is absent.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        self.inner.tags.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.inner.paths
    }

    /// Returns the path item stored under `path`, if any.
    #[must_use]
    pub fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.inner.paths.get(path)
    }

    /// Component schemas, or `None` when the document has no `components`.
    #[must_use]
    pub fn schemas(&self) -> Option<&IndexMap<String, Value>> {
        self.inner
            .components
            .as_ref()
            .map(|components| &components.schemas)
    }

    /// True when both handles point at the same parsed document.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Source location and the document parsed from it. Always updated together.
struct LoaderState {
    source: String,
    document: Option<ApiDocument>,
}

/// Lazily parses and caches one `OpenAPI` document for the process lifetime.
pub struct DocumentLoader {
    state: RwLock<LoaderState>,
    load_gate: Mutex<()>,
    parse: ParseFn,
}

impl DocumentLoader {
    /// Creates a loader for `source` using a custom parse function.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSource`] when `source` is blank.
    pub fn new(source: impl Into<String>, parse: ParseFn) -> Result<Self, ConfigError> {
        let source = validate_source(source.into())?;
        Ok(Self {
            state: RwLock::new(LoaderState {
                source,
                document: None,
            }),
            load_gate: Mutex::new(()),
            parse,
        })
    }

    /// Creates a loader backed by the default HTTP/file parser.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSource`] when `source` is blank.
    pub fn from_location(source: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(source, SourceParser::default().into_parse_fn())
    }

    #[must_use]
    pub fn source(&self) -> String {
        self.state.read().source.clone()
    }

    /// Points the loader at a new source, dropping the cache if it changed.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSource`] when `source` is blank; the
    /// current source and cache are left untouched.
    pub fn configure(&self, source: impl Into<String>) -> Result<(), ConfigError> {
        let source = validate_source(source.into())?;
        let mut state = self.state.write();
        if state.source != source {
            tracing::info!(from = %state.source, to = %source, "document source changed");
            state.source = source;
            state.document = None;
        }
        Ok(())
    }

    /// Returns the cached document, parsing the current source on first use.
    ///
    /// Failed parses are never cached, so the next call retries.
    ///
    /// # Errors
    /// Returns a [`LoadError`] wrapping the fetch or parse failure.
    pub async fn ensure_loaded(&self) -> Result<ApiDocument, LoadError> {
        if let Some(document) = self.snapshot() {
            return Ok(document);
        }

        let _gate = self.load_gate.lock().await;
        loop {
            let source = {
                let state = self.state.read();
                if let Some(document) = state.document.as_ref() {
                    return Ok(document.clone());
                }
                state.source.clone()
            };

            tracing::debug!(source = %source, "parsing OpenAPI document");
            let parsed = (self.parse)(source.clone()).await.map_err(|err| {
                tracing::warn!(source = %source, error = %err, "failed to load OpenAPI document");
                LoadError {
                    source_location: source.clone(),
                    source: err,
                }
            })?;
            let document = ApiDocument::new(parsed);

            let mut state = self.state.write();
            if state.source == source {
                tracing::info!(
                    source = %source,
                    paths = document.paths().len(),
                    "OpenAPI document loaded"
                );
                state.document = Some(document.clone());
                return Ok(document);
            }
            tracing::debug!(stale = %source, "source changed during load; retrying");
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<ApiDocument> {
        self.state.read().document.clone()
    }

    /// Declared tags, empty when nothing is loaded or the section is absent.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        self.snapshot()
            .map(|document| document.tags().to_vec())
            .unwrap_or_default()
    }

    /// Path items, empty when nothing is loaded.
    #[must_use]
    pub fn paths(&self) -> IndexMap<String, PathItem> {
        self.snapshot()
            .map(|document| document.paths().clone())
            .unwrap_or_default()
    }

    /// Component schemas, empty when nothing is loaded or none are declared.
    #[must_use]
    pub fn schemas(&self) -> IndexMap<String, Value> {
        self.snapshot()
            .and_then(|document| document.schemas().cloned())
            .unwrap_or_default()
    }
}

fn validate_source(source: String) -> Result<String, ConfigError> {
    if source.trim().is_empty() {
        return Err(ConfigError::MissingSource);
    }
    Ok(source)
}
