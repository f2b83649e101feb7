//! Core types and services for swagger-mcp.
//!
//! This crate owns the lazily loaded `OpenAPI` document, the fetch/parse step
//! that produces it, and the read-only queries answered against it.

pub mod catalog;
pub mod document;
pub mod loader;
pub mod query;
pub mod source;

pub use catalog::{ApiCatalog, CatalogError};
pub use document::{Operation, Tag};
pub use loader::{ApiDocument, ConfigError, DocumentLoader, LoadError};
pub use query::{ApiSummary, QueryError, SearchFilter};
