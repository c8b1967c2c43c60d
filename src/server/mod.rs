pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use axum::Router;
use axum::routing::{delete, get, post};
use eyre::{Context, Result};

use crate::config::ServerConfig;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/chats",
            post(handlers::create_chat).get(handlers::list_chats),
        )
        .route(
            "/api/chats/{id}",
            get(handlers::get_chat)
                .put(handlers::update_chat)
                .patch(handlers::update_chat_model)
                .delete(handlers::delete_chat),
        )
        .route("/api/chats/{id}/context", delete(handlers::clear_context))
        .route("/api/chat", post(handlers::send_message))
        .route("/api/models", get(handlers::list_models))
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err(format!("binding {}", address))?;

    log::info!("Listening on http://{}", address);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("serving HTTP")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
