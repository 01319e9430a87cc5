//! HTTP inference service for the energy model.

pub mod configs;
mod context;
mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use log::{info, warn};
use pipeline::artifact::FsModelStore;
use tokio::{net::TcpListener, signal};

pub use context::ServiceContext;
pub use error::{Result, ServeErr};

use crate::configs::ServerConfig;

/// Routes of the service, sharing one loaded model.
pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(ctx)
}

/// Loads the configured model and serves it until Ctrl-C.
///
/// # Errors
/// Returns a `ServeErr` if the model cannot be loaded or the address cannot
/// be bound. Request-level failures never end the server.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let store = FsModelStore::new(&config.store_root);
    let ctx = Arc::new(ServiceContext::load(&store, &config.tag)?);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("serving {} at {addr}", ctx.tag());

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received ctrl-c, shutting down"),
        Err(e) => {
            warn!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    }
}
