//! Server binary: wires the node registry, LLM transport, and settings
//! into an [`AppState`] and serves the HTTP surface, grounded on the
//! teacher's `orchestrator-server` binary shape (tracing init, graceful
//! shutdown on Ctrl-C/SIGTERM).

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use weft_api::{create_router, AppState};
use weft_llm::{HttpChatTransport, LlmConfig};
use weft_node::NodeRegistry;
use weft_tooling::Settings;

#[derive(Parser, Debug)]
#[command(name = "weft-server")]
struct Cli {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = weft_tooling::logging::init_logging();
    let cli = Cli::parse();

    tracing::info!("loading settings");
    let settings = Settings::from_env()?;

    tracing::info!("loading LLM transport configuration");
    let llm_config = LlmConfig::from_env()?;
    let transport: Arc<dyn weft_llm::ChatTransport> = Arc::new(HttpChatTransport::new(llm_config));

    let mut registry = NodeRegistry::new();
    weft_nodes::register_builtin_nodes(&mut registry)?;
    weft_nodes::register_serper_search(&mut registry)?;
    let registry = Arc::new(registry);

    let state = AppState::new(registry, transport, settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!("starting weft server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("weft server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM signal, shutting down");
        }
    }
}
