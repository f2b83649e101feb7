//! Transports that expose [`SwaggerMcp`] to clients.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use swagger_core::ApiCatalog;

use crate::SwaggerMcp;

type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// How the daemon talks to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// JSON-RPC over the process's stdin and stdout.
    Stdio,
    /// Streamable HTTP mounted at `/mcp`, plus a `/health` route.
    Http(HttpOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub addr: SocketAddr,
    /// Keep per-client sessions; when false every request stands alone.
    pub stateful: bool,
    /// SSE keep-alive interval; `None` disables the pings.
    pub keep_alive: Option<Duration>,
}

impl HttpOptions {
    fn service_config(&self) -> StreamableHttpServerConfig {
        StreamableHttpServerConfig {
            sse_keep_alive: self.keep_alive,
            stateful_mode: self.stateful,
            ..Default::default()
        }
    }
}

/// Runs the server on `transport` until the client disconnects or the
/// listener fails. Every session shares the catalog's cached document.
///
/// # Errors
/// Returns any bind, transport or protocol error.
pub async fn serve(catalog: ApiCatalog, transport: Transport) -> ServeResult {
    match transport {
        Transport::Stdio => serve_stdio(catalog).await,
        Transport::Http(options) => serve_http(catalog, &options).await,
    }
}

async fn serve_stdio(catalog: ApiCatalog) -> ServeResult {
    tracing::info!("serving MCP over stdio");
    let running = serve_server(SwaggerMcp::new(catalog), stdio()).await?;
    let reason = running.waiting().await?;
    tracing::info!(?reason, "stdio session ended");
    Ok(())
}

async fn serve_http(catalog: ApiCatalog, options: &HttpOptions) -> ServeResult {
    let mcp: StreamableHttpService<SwaggerMcp, LocalSessionManager> = StreamableHttpService::new(
        move || Ok(SwaggerMcp::new(catalog.clone())),
        Arc::new(LocalSessionManager::default()),
        options.service_config(),
    );
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind(options.addr).await?;
    tracing::info!(
        addr = %options.addr,
        stateful = options.stateful,
        "serving MCP over streamable HTTP at /mcp"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
