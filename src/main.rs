// Escrow Market - Main Entry Point

use std::sync::Arc;

use escrow_market::{router, AppState, Config, SharedState, SystemClock};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    tracing_subscriber::fmt().with_max_level(config.log_level).init();

    tracing::info!("starting binary escrow market");

    let addr = config.bind_addr;
    let persist = config.persist;
    let (state, admin) = match AppState::boot(config, Arc::new(SystemClock)) {
        Ok(booted) => booted,
        Err(e) => {
            tracing::error!("failed to start: {}", e);
            std::process::exit(1);
        }
    };

    match admin.as_ref().map(|admin| admin.issuance_notice()) {
        // Straight to the terminal, never through the log pipeline
        Some(Some(notice)) => {
            println!("{}", notice);
            tracing::warn!("new deployment, generated admin credential printed to stdout");
        }
        Some(None) => tracing::info!("new deployment, admin credential taken from ESCROW_ADMIN_TOKEN"),
        None => tracing::info!("resumed existing deployment"),
    }

    let state: SharedState = Arc::new(state);
    let shutdown_state = state.clone();
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, "failed to bind: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "server running");

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install ctrl-c handler: {}", e);
            return;
        }
        tracing::info!("shutdown signal received");
    };

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        tracing::error!("server error: {}", e);
    }

    if persist {
        if let Err(e) = shutdown_state.save_to_disk() {
            tracing::error!("failed to save state: {}", e);
        }
    }
    tracing::info!("goodbye");
}
