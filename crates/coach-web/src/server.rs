//! Axum server setup and router construction.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::{get, post};
use coach_rs::coach::Coach;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - coaching endpoints at `/ai-coach/*`
/// - `GET /health`
/// - optional static files for a front-end build
pub fn build_router(coach: Coach, static_dir: Option<PathBuf>) -> Router {
    let app_state = AppState { coach };

    // The front end is usually served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/ai-coach/chat", post(api::post_chat))
        .route("/ai-coach/generate", post(api::post_generate))
        .route("/ai-coach/analyze", post(api::post_analyze))
        .route("/ai-coach/exercises", post(api::post_exercises))
        .route("/ai-coach/form-tips", post(api::post_form_tips))
        .with_state(app_state);

    let mut router = Router::new()
        .route("/health", get(api::get_health))
        .merge(api_routes)
        .layer(cors);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind `bind_addr` and serve `router` on a background task.
///
/// Returns the bound address (useful with port 0).
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Web server stopped: {e}");
        }
    });

    Ok(addr)
}

/// Bind and serve in the foreground until `shutdown` resolves.
pub async fn serve_until(
    router: Router,
    bind_addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
