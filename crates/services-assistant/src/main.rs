mod answer;
mod catalog;
mod config;
mod error;
mod mcp_api;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use service_rag::embedding::{Embedder, FastEmbedder};
use service_rag::index::Index;
use service_rag::retriever::Retriever;

use config::Config;
use server::ServicesAssistantServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting services-assistant MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    let catalog_source = config
        .catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    info!(
        catalog = %catalog_source,
        default_lang = config.default_language.code(),
        top_k = config.rag.top_k,
        similarity_threshold = config.rag.similarity_threshold,
        min_similarity = config.rag.min_similarity,
        "configuration loaded"
    );

    // 2. Load and validate the catalog
    let catalog = catalog::load_catalog(config.catalog_path.as_deref())?;
    info!(services = catalog.len(), "catalog loaded");

    // 3. Initialize embedding model
    info!("initializing embedding model (may download on first run)");
    let embedder: Arc<dyn Embedder> =
        Arc::new(tokio::task::spawn_blocking(FastEmbedder::new).await??);
    info!(dimensions = embedder.dimensions(), "embedding model ready");

    // 4. Build the retrieval index. A broken index must never serve queries.
    let index = {
        let embedder = Arc::clone(&embedder);
        tokio::task::spawn_blocking(move || Index::build(&catalog, embedder.as_ref())).await??
    };
    let retriever = Arc::new(Retriever::new(index, embedder, config.rag.clone()));

    // 5. Build MCP server and serve on stdio
    let server = ServicesAssistantServer::new(retriever, config.default_language);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
