//! Wire types for Twitter API v2 responses.
//!
//! Only the fields the service reads are modelled. Every optional section of a v2
//! response defaults, so an empty timeline decodes to an empty `data` list.

use serde::{Deserialize, Serialize};

/// Engagement counters attached to a tweet when `tweet.fields=public_metrics` is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub impression_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub username: String,
}

/// Objects expanded alongside the primary data (`expansions=author_id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Paging information reported alongside a list of tweets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// A page of tweets as returned by timeline, mention and search endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetList {
    #[serde(default)]
    pub data: Vec<Tweet>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl TweetList {
    /// Finds an expanded user by id.
    pub fn author(&self, author_id: &str) -> Option<&User> {
        self.includes.users.iter().find(|u| u.id == author_id)
    }
}

/// Envelope for single-object lookups. `data` is absent when the object was not found.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Single<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LikeStatus {
    #[serde(default)]
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timeline_decodes_to_empty_list() {
        let list: TweetList =
            serde_json::from_str(r#"{"meta":{"result_count":0}}"#).unwrap();
        assert!(list.data.is_empty());
        assert!(list.includes.users.is_empty());
        assert_eq!(list.meta.unwrap().result_count, Some(0));
    }

    #[test]
    fn test_timeline_with_expansions() {
        let body = r#"{
            "data": [
                {"id": "1", "text": "hello", "author_id": "42", "created_at": "2024-01-01T00:00:00.000Z",
                 "public_metrics": {"like_count": 3, "retweet_count": 1, "reply_count": 0, "quote_count": 0}}
            ],
            "includes": {"users": [{"id": "42", "name": "Alice", "username": "alice"}]}
        }"#;
        let list: TweetList = serde_json::from_str(body).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.author("42").unwrap().username, "alice");
        assert!(list.author("7").is_none());

        let metrics = list.data[0].public_metrics.clone().unwrap();
        assert_eq!(metrics.like_count, 3);
        assert_eq!(metrics.impression_count, 0);
    }

    #[test]
    fn test_missing_single_object() {
        let single: Single<User> = serde_json::from_str(
            r#"{"errors":[{"detail":"Could not find user with username: [nobody]."}]}"#,
        )
        .unwrap();
        assert!(single.data.is_none());
    }
}
