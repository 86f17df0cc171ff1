//! Tweet operations for Twitter API.
//!
//! This module contains the calls that post, reply to, like and look up single
//! tweets using the Twitter API v2.

use log::{debug, info};
use serde_json::json;

use super::api::{sanitize_for_logging, TwitterClient, TwitterError};
use super::types::{LikeStatus, Single, Tweet};

/// Fields requested whenever a full tweet is looked up.
pub(crate) const TWEET_FIELDS: &str = "created_at,public_metrics,author_id,conversation_id";

impl TwitterClient {
    /// Posts a tweet via `POST /2/tweets`.
    pub async fn post_tweet(&self, text: &str) -> Result<Tweet, TwitterError> {
        info!(
            "Starting tweet post operation for text: '{}'",
            sanitize_for_logging(text, 100)
        );

        let payload = json!({ "text": text });
        debug!("Tweet payload: {}", payload);

        let created: Single<Tweet> = self
            .send(self.post("/2/tweets").json(&payload), "post_tweet")
            .await?;
        created_or_error(created, text)
    }

    /// Replies to an existing tweet via `POST /2/tweets` with a `reply` section.
    pub async fn reply_to_tweet(
        &self,
        text: &str,
        reply_to_tweet_id: &str,
    ) -> Result<Tweet, TwitterError> {
        info!(
            "Starting reply operation to tweet {} with text: '{}'",
            reply_to_tweet_id,
            sanitize_for_logging(text, 100)
        );

        let payload = json!({
            "text": text,
            "reply": {
                "in_reply_to_tweet_id": reply_to_tweet_id
            }
        });
        debug!("Reply payload: {}", payload);

        let created: Single<Tweet> = self
            .send(self.post("/2/tweets").json(&payload), "reply_to_tweet")
            .await?;
        created_or_error(created, text)
    }

    /// Likes a tweet on behalf of `user_id` via `POST /2/users/:id/likes`.
    pub async fn like_tweet(&self, user_id: &str, tweet_id: &str) -> Result<bool, TwitterError> {
        info!("Liking tweet {} as user {}", tweet_id, user_id);

        let payload = json!({ "tweet_id": tweet_id });
        let path = format!("/2/users/{}/likes", urlencoding::encode(user_id));
        let status: Single<LikeStatus> = self.send(self.post(&path).json(&payload), "like").await?;
        Ok(status.data.map(|s| s.liked).unwrap_or(false))
    }

    /// Looks up a single tweet with its public metrics via `GET /2/tweets/:id`.
    ///
    /// Returns `Ok(None)` when the API reports that the tweet does not exist.
    pub async fn lookup_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError> {
        info!("Looking up tweet {}", tweet_id);

        let path = format!("/2/tweets/{}", urlencoding::encode(tweet_id));
        let request = self.get(&path).query(&[("tweet.fields", TWEET_FIELDS)]);
        let single: Single<Tweet> = self.send(request, "single_tweet").await?;
        Ok(single.data)
    }
}

/// A create call always answers with the new tweet; a missing `data` means the
/// response was not the one the API documents.
fn created_or_error(created: Single<Tweet>, text: &str) -> Result<Tweet, TwitterError> {
    match created.data {
        Some(mut tweet) => {
            if tweet.text.is_empty() {
                tweet.text = text.to_string();
            }
            info!("Tweet {} created successfully", tweet.id);
            Ok(tweet)
        }
        None => Err(TwitterError::Api {
            status: 502,
            message: "Twitter API response did not contain the created tweet".to_string(),
            rate_limit_reset: None,
        }),
    }
}
