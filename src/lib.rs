//! # Threadsbot Library
//!
//! A Rust web service library exposing a small REST API over the Twitter/X API and a
//! GAME autonomous agent. Threads are the authenticated account's own posts; tweets,
//! replies, likes, analytics and mentions are forwarded to the Twitter API through the
//! GAME Twitter proxy.
//!
//! ## Configuration
//!
//! - `GAME_API_KEY`: API key for the GAME agent runtime
//! - `GAME_TWITTER_ACCESS_TOKEN`: access token for the GAME Twitter proxy
//! - `PORT`: Server port (defaults to 3000)
//! - `NODE_ENV`: `development` or `production` (defaults to development)
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a welcome message
//! - `GET /health`: Returns service health status
//! - `GET /threads`: Sample thread listing
//! - `GET /x/thread`: Lists the account's threads (`?page=&limit=`)
//! - `POST /x/tweet`: Posts a tweet
//! - `POST /x/reply`: Replies to a tweet
//! - `POST /x/like/:tweet_id`: Likes a tweet
//! - `GET /x/analytics/:tweet_id`: Engagement counters of a tweet
//! - `GET /x/mentions`: Mentions of the account (`?page=&limit=`)
//! - `GET /x/mentions/:username`: Recent posts mentioning a user (`?limit=`)
//! - `POST /x/thread`: Posts a thread

pub mod config;
pub mod error;
pub mod game;
pub mod handlers;
pub mod models;
pub mod service;
pub mod threads;
pub mod twitter;

use axum::{
    routing::{get, post},
    Router,
};

// Re-export commonly used types and functions
pub use config::{AppConfig, Environment};
pub use error::ServiceError;
pub use handlers::AppState;
pub use service::XService;
pub use threads::ThreadsService;

use handlers::{
    handle_analytics, handle_health, handle_like, handle_list_sample_threads,
    handle_list_threads, handle_mentions, handle_post_thread, handle_post_tweet, handle_reply,
    handle_root, handle_user_mentions,
};

/// Builds the route table. Middleware layers are added by the caller.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/threads", get(handle_list_sample_threads))
        .route("/x/thread", get(handle_list_threads).post(handle_post_thread))
        .route("/x/tweet", post(handle_post_tweet))
        .route("/x/reply", post(handle_reply))
        .route("/x/like/:tweet_id", post(handle_like))
        .route("/x/analytics/:tweet_id", get(handle_analytics))
        .route("/x/mentions", get(handle_mentions))
        .route("/x/mentions/:username", get(handle_user_mentions))
        .with_state(state)
}
