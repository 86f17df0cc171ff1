//! Twitter/X API integration module.
//!
//! This module contains the [`TwitterApi`] seam the service talks to, the
//! [`TwitterClient`] that implements it over HTTP, and the wire types and text
//! helpers shared by both.

mod api;
mod parsing;
mod search;
mod tweets;
mod types;
mod users;

use async_trait::async_trait;

pub use api::{TwitterClient, TwitterError};
pub use parsing::{format_mentions, normalize_username};
pub use search::{MAX_PAGE_SIZE, MIN_SEARCH_PAGE_SIZE};
pub use types::{Includes, Meta, PublicMetrics, Tweet, TweetList, User};

pub(crate) use api::sanitize_for_logging;

/// Operations the service needs from the Twitter/X API.
///
/// Implemented by [`TwitterClient`] for production and by in-memory fakes in tests.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// The user the configured access token belongs to.
    async fn me(&self) -> Result<User, TwitterError>;

    async fn tweet(&self, text: &str) -> Result<Tweet, TwitterError>;

    async fn reply(&self, text: &str, in_reply_to_tweet_id: &str) -> Result<Tweet, TwitterError>;

    /// Likes `tweet_id` as `user_id`; returns whether the tweet is now liked.
    async fn like(&self, user_id: &str, tweet_id: &str) -> Result<bool, TwitterError>;

    async fn user_timeline(&self, user_id: &str, max_results: u32)
        -> Result<TweetList, TwitterError>;

    async fn single_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError>;

    async fn user_mention_timeline(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError>;

    async fn search(&self, query: &str, max_results: u32) -> Result<TweetList, TwitterError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, TwitterError>;
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn me(&self) -> Result<User, TwitterError> {
        self.lookup_me().await
    }

    async fn tweet(&self, text: &str) -> Result<Tweet, TwitterError> {
        self.post_tweet(text).await
    }

    async fn reply(&self, text: &str, in_reply_to_tweet_id: &str) -> Result<Tweet, TwitterError> {
        self.reply_to_tweet(text, in_reply_to_tweet_id).await
    }

    async fn like(&self, user_id: &str, tweet_id: &str) -> Result<bool, TwitterError> {
        self.like_tweet(user_id, tweet_id).await
    }

    async fn user_timeline(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError> {
        self.fetch_user_timeline(user_id, max_results).await
    }

    async fn single_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError> {
        self.lookup_tweet(tweet_id).await
    }

    async fn user_mention_timeline(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError> {
        self.fetch_user_mentions(user_id, max_results).await
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<TweetList, TwitterError> {
        self.search_recent(query, max_results).await
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, TwitterError> {
        self.lookup_user_by_username(username).await
    }
}
