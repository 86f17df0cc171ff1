//! # Threadsbot
//!
//! A Rust web service exposing REST endpoints for posting and browsing Twitter/X
//! threads, with a GAME agent stepped alongside the thread listing.
//!
//! ## Environment Variables
//!
//! - `GAME_API_KEY`: API key for the GAME agent runtime
//! - `GAME_TWITTER_ACCESS_TOKEN`: access token for the GAME Twitter proxy
//! - `PORT`: Server port (defaults to 3000)
//! - `NODE_ENV`: `development` or `production`
//! - `RUST_LOG`: log filter for `env_logger`

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use threadsbot::game::{
    twitter_worker, AgentConfig, AgentRuntime, GameAgent, GameClient, LlmModel,
};
use threadsbot::twitter::{TwitterApi, TwitterClient};
use threadsbot::{build_router, AppConfig, AppState, ThreadsService, XService};

/// Completes on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Main entry point for the threadsbot web service.
///
/// Loads configuration, creates the Twitter client and the GAME agent, initializes
/// the agent once, then serves HTTP until a shutdown signal arrives.
///
/// # Example Usage
///
/// ```bash
/// GAME_API_KEY=... GAME_TWITTER_ACCESS_TOKEN=... RUST_LOG=info cargo run
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize the logging system
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let twitter: Arc<dyn TwitterApi> = Arc::new(TwitterClient::new(
        &config.x_api_base_url,
        &config.game_twitter_access_token,
    ));

    let agent_config = AgentConfig {
        name: "Threads Bot".to_string(),
        goal: "List and manage threads".to_string(),
        description: "A bot that lists and manages threads".to_string(),
        llm_model: LlmModel::default(),
    };
    let game_client = GameClient::new(
        &config.game_api_key,
        &config.game_api_base_url,
        &config.game_access_url,
        agent_config.llm_model.as_str(),
    );
    let agent = Arc::new(GameAgent::new(
        game_client,
        agent_config,
        vec![twitter_worker(Arc::clone(&twitter))],
    ));

    // Initialize once; the service cannot list threads without a registered agent
    agent.init().await.map_err(|e| {
        error!("Failed to initialize GAME agent: {}", e);
        e
    })?;

    let state = AppState {
        x: XService::new(twitter, agent),
        threads: ThreadsService::new(),
    };

    let cors = if config.environment.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    };

    // Build the HTTP application with all routes and middleware
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!(
        "Starting threadsbot server on {} ({})",
        addr, config.environment
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
