//! Serve commands.
//!
//! `gatehouse serve issuer` - Start the credential issuer.
//! `gatehouse serve users` - Start the profile service.

use anyhow::Context;
use axum::Router;
use gatehouse_core::GatehouseConfig;
use gatehouse_issuer::IssuerState;
use gatehouse_users::UsersState;
use tokio::net::TcpListener;

/// Start the issuer and block until Ctrl-C.
pub async fn issuer(cfg: GatehouseConfig, bind: Option<String>) -> anyhow::Result<()> {
    let state = IssuerState::init(&cfg).await?;
    let addr = bind.unwrap_or_else(|| cfg.issuer.bind.clone());
    run("issuer", gatehouse_issuer::create_router(state), &addr).await
}

/// Start the users service and block until Ctrl-C.
pub async fn users(cfg: GatehouseConfig, bind: Option<String>) -> anyhow::Result<()> {
    let state = UsersState::init(&cfg).await?;
    let addr = bind.unwrap_or_else(|| cfg.users.bind.clone());
    run("users", gatehouse_users::create_router(state), &addr).await
}

async fn run(service: &str, app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(service, address = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{service} server failed"))?;

    tracing::info!(service, "stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
