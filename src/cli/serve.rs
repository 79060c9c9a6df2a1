//! Serve command - HTTP API and chat UI on one port

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use tokio::net::TcpListener;
use tracing::info;

use super::GlobalArgs;
use crate::api::create_router;
use crate::config::AppConfig;

#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Directory with the chat UI (overrides config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

pub async fn run(global: GlobalArgs, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(&global)?;
    apply_overrides(&mut config, &args);

    let state = crate::create_app_state_with_config(&config).await?;
    let app = create_router(state, &config.server.static_dir);

    let addr = build_socket_addr(&config)?;
    info!(
        %addr,
        static_dir = %config.server.static_dir.display(),
        "Starting course assistant server"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.static_dir {
        config.server.static_dir = dir.clone();
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
