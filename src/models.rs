//! Request and response types of the HTTP API.
//!
//! None of these are stored; each is built from an upstream response for a single
//! request and dropped once serialized.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A single post, presented as a thread entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetAnalytics {
    pub id: String,
    pub text: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub views: u64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetMention {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_username: String,
    pub author_name: String,
    pub created_at: Option<String>,
}

/// One entry of a thread to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPost {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<String>>,
}

impl ThreadPost {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            mentions: None,
        }
    }
}

/// A post that mentions a given user, with the conversation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionedPost {
    pub tweet_id: String,
    pub thread_id: String,
    pub text: String,
    pub author_username: String,
    pub author_name: String,
    pub created_at: Option<String>,
}

/// A tweet the service just created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResult {
    pub tweet_id: String,
    pub liked: bool,
}

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SearchMentionsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostTweetRequest {
    pub content: String,
    /// Kept for callers of the agent-style API; logged, not posted.
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub mentions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    #[serde(alias = "tweetId")]
    pub tweet_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostThreadRequest {
    pub posts: Vec<ThreadPost>,
}

/// Returns the `page`-th window of `limit` items (pages start at 1).
///
/// The window is `[(page-1)*limit, page*limit)` clipped to the list; page 0 is read as
/// page 1.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Vec<T> {
    let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    items.into_iter().skip(offset).take(limit as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_windows() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(items.clone(), 1, 10), (0..10).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 3, 10), (20..25).collect::<Vec<_>>());
        assert!(paginate(items.clone(), 4, 10).is_empty());
        assert!(paginate(items.clone(), 1, 0).is_empty());
        assert_eq!(paginate(items, 0, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_paginate_matches_slice_for_every_window() {
        let items: Vec<u32> = (0..17).collect();
        for page in 1..6u32 {
            for limit in 0..8u32 {
                let start = ((page - 1) * limit) as usize;
                let end = (page * limit) as usize;
                let expected: Vec<u32> = items
                    .get(start.min(items.len())..end.min(items.len()))
                    .unwrap()
                    .to_vec();
                let got = paginate(items.clone(), page, limit);
                assert!(got.len() <= limit as usize);
                assert_eq!(got, expected, "page {} limit {}", page, limit);
            }
        }
    }

    #[test]
    fn test_paginate_huge_page_does_not_overflow() {
        assert!(paginate(vec![1, 2, 3], u32::MAX, u32::MAX).is_empty());
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_reply_request_accepts_camel_case() {
        let req: ReplyRequest =
            serde_json::from_str(r#"{"tweetId": "123", "content": "hey"}"#).unwrap();
        assert_eq!(req.tweet_id, "123");
    }
}
