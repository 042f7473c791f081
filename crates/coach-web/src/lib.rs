//! HTTP front door for the `coach-rs` coaching pipeline.
//!
//! `coach-web` exposes the [`Coach`] operations as JSON endpoints for a
//! browser front end:
//!
//! | Endpoint | Body | 200 |
//! |---|---|---|
//! | `POST /ai-coach/chat` | `{message, context?}` | `{response}` |
//! | `POST /ai-coach/generate` | `{userProfile, week?, previousFeedback?}` | workout plan |
//! | `POST /ai-coach/analyze` | `{userProfile, workoutHistory?, personalRecords?}` | progress analysis |
//! | `POST /ai-coach/exercises` | `{muscleGroup, equipment?, difficulty?}` | `{exercises}` |
//! | `POST /ai-coach/form-tips` | `{exerciseName}` | `{tips}` |
//! | `GET /health` | | `{status: "ok"}` |
//!
//! Bad input is a 400; any pipeline failure is a 500. Both carry
//! `{error, code}`, where `code` is `bad_request` or the
//! [`ErrorKind`](coach_rs::error::ErrorKind) of the failure.
//!
//! # Quick start
//!
//! ```ignore
//! use coach_rs::prelude::*;
//! use coach_web::{WebConfig, spawn_web};
//!
//! let coach = Coach::from_config(GatewayConfig::from_env(), RetryConfig::default())?;
//! let addr = spawn_web(coach, WebConfig::default()).await?;
//! println!("Coach API: http://{addr}");
//! ```

mod api;
mod server;

pub use api::ErrorBody;
pub use server::build_router;

use std::net::SocketAddr;
use std::path::PathBuf;

use coach_rs::coach::Coach;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory of a static front-end build to serve for non-API paths.
    ///
    /// If `None`, only the API is served and the front end runs
    /// separately.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(coach: Coach, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = server::build_router(coach, config.static_dir);
    server::start_server(router, config.bind_addr).await
}

/// Serve in the foreground until Ctrl-C.
pub async fn run_web(coach: Coach, config: WebConfig) -> std::io::Result<()> {
    let router = server::build_router(coach, config.static_dir);
    server::serve_until(router, config.bind_addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down");
    })
    .await
}
