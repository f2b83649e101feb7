//! Daemon entry point for the swagger MCP server.
//!
//! Loads configuration from the command line and environment, builds the
//! document loader, and serves the MCP protocol over stdio or streamable HTTP.

mod config;

use std::sync::Arc;

use swagger_core::{ApiCatalog, DocumentLoader};
use swagger_mcp::server::{HttpOptions, Transport, serve};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

const DEFAULT_LOG_FILTER: &str = "info,swagger_core=debug,swagger_mcp=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the stdio protocol stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_args()?;
    tracing::info!(source = %config.source, "starting swagger-mcpd");

    let loader = Arc::new(DocumentLoader::from_location(config.source.clone())?);
    let catalog = ApiCatalog::new(loader.clone());

    if config.eager
        && let Err(err) = loader.ensure_loaded().await
    {
        tracing::warn!(error = %err, "eager load failed; will retry on first tool call");
    }

    let transport = config.http_addr.map_or(Transport::Stdio, |addr| {
        Transport::Http(HttpOptions {
            addr,
            stateful: !config.stateless,
            keep_alive: config.sse_keep_alive,
        })
    });
    serve(catalog, transport).await
}
