//! Timeline and search queries for Twitter API.
//!
//! All three endpoints answer with a page of tweets plus expanded authors, so they
//! share one request shape.

use log::{debug, info};

use super::api::{TwitterClient, TwitterError};
use super::tweets::TWEET_FIELDS;
use super::types::TweetList;

/// Twitter accepts `max_results` in `5..=100` for timelines and `10..=100` for search.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MIN_SEARCH_PAGE_SIZE: u32 = 10;
const MIN_TIMELINE_PAGE_SIZE: u32 = 5;

impl TwitterClient {
    async fn fetch_tweet_list(
        &self,
        path: &str,
        extra: &[(&str, &str)],
        max_results: u32,
        operation_name: &str,
    ) -> Result<TweetList, TwitterError> {
        let max_results = max_results.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("max_results", max_results.as_str()),
            ("tweet.fields", TWEET_FIELDS),
            ("expansions", "author_id"),
            ("user.fields", "username,name"),
        ];
        query.extend_from_slice(extra);

        let list: TweetList = self
            .send(self.get(path).query(&query), operation_name)
            .await?;
        let meta = list.meta.clone().unwrap_or_default();
        debug!(
            "Operation '{}' returned {} tweets (result_count: {:?}, more pages: {})",
            operation_name,
            list.data.len(),
            meta.result_count,
            meta.next_token.is_some()
        );
        Ok(list)
    }

    /// Fetches the most recent tweets authored by `user_id`.
    pub async fn fetch_user_timeline(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError> {
        info!("Fetching timeline for user {}", user_id);
        let path = format!("/2/users/{}/tweets", urlencoding::encode(user_id));
        let max_results = max_results.clamp(MIN_TIMELINE_PAGE_SIZE, MAX_PAGE_SIZE);
        self.fetch_tweet_list(&path, &[], max_results, "user_timeline")
            .await
    }

    /// Fetches the most recent tweets mentioning `user_id`.
    pub async fn fetch_user_mentions(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError> {
        info!("Fetching mention timeline for user {}", user_id);
        let path = format!("/2/users/{}/mentions", urlencoding::encode(user_id));
        let max_results = max_results.clamp(MIN_TIMELINE_PAGE_SIZE, MAX_PAGE_SIZE);
        self.fetch_tweet_list(&path, &[], max_results, "user_mention_timeline")
            .await
    }

    /// Searches tweets from the last seven days matching `query`.
    pub async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<TweetList, TwitterError> {
        info!("Searching recent tweets for query: {}", query);
        let max_results = max_results.clamp(MIN_SEARCH_PAGE_SIZE, MAX_PAGE_SIZE);
        self.fetch_tweet_list(
            "/2/tweets/search/recent",
            &[("query", query)],
            max_results,
            "search",
        )
        .await
    }
}
