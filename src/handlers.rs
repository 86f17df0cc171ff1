//! HTTP route handlers for the threadsbot service.
//!
//! Each handler extracts typed input, calls one service operation and serializes the
//! result. Failures are rendered by [`ServiceError`]'s `IntoResponse` impl.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use log::info;
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::models::{
    LikeResult, MentionedPost, PageQuery, PostThreadRequest, PostTweetRequest, ReplyRequest,
    SearchMentionsQuery, Thread, TweetAnalytics, TweetMention, DEFAULT_PAGE_SIZE,
};
use crate::service::XService;
use crate::threads::ThreadsService;
use crate::twitter::sanitize_for_logging;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub x: XService,
    pub threads: ThreadsService,
}

fn page_params(query: &PageQuery) -> Result<(u32, u32), ServiceError> {
    if query.page == Some(0) {
        return Err(ServiceError::InvalidInput(
            "page must be at least 1".to_string(),
        ));
    }
    Ok((query.page(), query.limit()))
}

/// Handles GET requests to the root `/` endpoint.
pub async fn handle_root() -> &'static str {
    "threadsbot is up. Try GET /x/thread"
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "threadsbot"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "threadsbot"}))
}

/// Handles GET requests to `/threads` (sample data, no upstream).
pub async fn handle_list_sample_threads(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Thread>>, ServiceError> {
    let (page, limit) = page_params(&query)?;
    Ok(Json(state.threads.list_threads(page, limit)))
}

/// Handles GET requests to `/x/thread`.
///
/// Returns the authenticated account's recent tweets as `[{id, title}]`, paginated by
/// `?page=` (from 1) and `?limit=` (default 10).
pub async fn handle_list_threads(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Thread>>, ServiceError> {
    let (page, limit) = page_params(&query)?;
    Ok(Json(state.x.list_threads(page, limit).await?))
}

/// Handles POST requests to `/x/tweet`.
///
/// # Request Body
///
/// ```json
/// { "content": "gm", "reasoning": "morning post", "mentions": ["alice"] }
/// ```
pub async fn handle_post_tweet(
    State(state): State<AppState>,
    Json(request): Json<PostTweetRequest>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    if let Some(reasoning) = request.reasoning.as_deref() {
        info!("Tweet reasoning: {}", sanitize_for_logging(reasoning, 200));
    }
    let tweet = state
        .x
        .post_tweet(&request.content, request.mentions.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "message": "Tweet posted", "tweet": tweet})),
    ))
}

/// Handles POST requests to `/x/reply`.
pub async fn handle_reply(
    State(state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let tweet = state
        .x
        .reply_to_tweet(&request.tweet_id, &request.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "message": "Reply posted", "tweet": tweet})),
    ))
}

/// Handles POST requests to `/x/like/:tweet_id`.
pub async fn handle_like(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<LikeResult>, ServiceError> {
    Ok(Json(state.x.like_tweet(&tweet_id).await?))
}

/// Handles GET requests to `/x/analytics/:tweet_id`.
pub async fn handle_analytics(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<TweetAnalytics>, ServiceError> {
    Ok(Json(state.x.get_tweet_analytics(&tweet_id).await?))
}

/// Handles GET requests to `/x/mentions`.
pub async fn handle_mentions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<TweetMention>>, ServiceError> {
    let (page, limit) = page_params(&query)?;
    Ok(Json(state.x.get_mentions(page, limit).await?))
}

/// Handles GET requests to `/x/mentions/:username`.
pub async fn handle_user_mentions(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<SearchMentionsQuery>,
) -> Result<Json<Vec<MentionedPost>>, ServiceError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    Ok(Json(state.x.search_user_mentions(&username, limit).await?))
}

/// Handles POST requests to `/x/thread`.
///
/// # Request Body
///
/// ```json
/// { "posts": [{ "content": "1/2 ..." }, { "content": "2/2 ...", "mentions": ["bob"] }] }
/// ```
pub async fn handle_post_thread(
    State(state): State<AppState>,
    Json(request): Json<PostThreadRequest>,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let tweets = state.x.post_thread(&request.posts).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"status": "success", "message": "Thread posted", "tweets": tweets})),
    ))
}
