//! Coaching API server.
//!
//! Serves the `/ai-coach/*` endpoints backed by a chat-completions model.
//!
//! # Usage
//!
//! ```bash
//! ZHIPU_API_KEY=... cargo run -p coach-web
//! ZHIPU_API_KEY=... cargo run -p coach-web -- --port 8080 --model glm-4
//! ZHIPU_API_KEY=... cargo run -p coach-web -- --static-dir ./out --retries 2
//! ```
//!
//! ```bash
//! curl -X POST localhost:3001/ai-coach/chat \
//!   -H 'content-type: application/json' \
//!   -d '{"message": "How many rest days do I need?"}'
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use coach_rs::config::API_KEY_ENV;
use coach_rs::prelude::*;
use coach_web::{WebConfig, run_web};
use tracing::{info, warn};

/// Coaching API server.
#[derive(Parser)]
#[command(about = "HTTP API for workout generation and coaching chat")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "COACH_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Serve a static front-end build from this directory.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Model to use (default: glm-3-turbo).
    #[arg(long, env = "ZHIPU_MODEL")]
    model: Option<String>,

    /// API base URL, without the /chat/completions suffix.
    #[arg(long, env = "ZHIPU_BASE_URL")]
    base_url: Option<String>,

    /// Retries for transient upstream failures (0 = none).
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = GatewayConfig::from_env();
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    // Still start: the front end shows the configuration error per request.
    if !config.has_api_key() {
        warn!("{API_KEY_ENV} is not set; every coaching request will fail until it is");
    }
    info!("Using model {} at {}", config.model, config.base_url);

    let coach = Coach::from_config(config, RetryConfig::with_retries(args.retries))
        .map_err(|e| e.to_string())?;

    let web_config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        static_dir: args.static_dir,
    };
    run_web(coach, web_config)
        .await
        .map_err(|e| format!("server error: {e}"))
}
