//! Query entry points that make sure the document is loaded first.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::document::{Operation, Tag};
use crate::loader::{ApiDocument, DocumentLoader, LoadError};
use crate::query::{self, ApiSummary, QueryError, SearchFilter};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Shares one [`DocumentLoader`] between every query.
#[derive(Clone)]
pub struct ApiCatalog {
    loader: Arc<DocumentLoader>,
}

impl ApiCatalog {
    #[must_use]
    pub const fn new(loader: Arc<DocumentLoader>) -> Self {
        Self { loader }
    }

    #[must_use]
    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    async fn document(&self) -> Result<ApiDocument, CatalogError> {
        Ok(self.loader.ensure_loaded().await?)
    }

    /// # Errors
    /// Returns [`CatalogError::Load`] when the document cannot be loaded.
    pub async fn list_api_groups(&self) -> Result<Vec<Tag>, CatalogError> {
        let document = self.document().await?;
        Ok(query::list_api_groups(&document))
    }

    /// # Errors
    /// Returns [`CatalogError::Load`] when the document cannot be loaded.
    pub async fn search_apis(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<ApiSummary>, CatalogError> {
        let document = self.document().await?;
        Ok(query::search_apis(&document, filter))
    }

    /// # Errors
    /// Returns [`CatalogError::Load`] when the document cannot be loaded and
    /// [`CatalogError::Query`] when the path or method is missing.
    pub async fn get_api_detail(
        &self,
        path: &str,
        method: &str,
    ) -> Result<Operation, CatalogError> {
        let document = self.document().await?;
        Ok(query::get_api_detail(&document, path, method)?)
    }

    /// # Errors
    /// Returns [`CatalogError::Load`] when the document cannot be loaded and
    /// [`CatalogError::Query`] when no schema has the requested name.
    pub async fn get_schema(&self, reference: &str) -> Result<Value, CatalogError> {
        let document = self.document().await?;
        Ok(query::get_schema(&document, reference)?)
    }
}
