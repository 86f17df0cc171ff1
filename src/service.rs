//! Thread and tweet operations.
//!
//! [`XService`] holds one handle to the Twitter API and one to the agent runtime.
//! Every operation is one or two upstream calls followed by field remapping; upstream
//! failures are translated by [`ServiceError`].

use std::sync::Arc;

use log::{debug, info};

use crate::error::ServiceError;
use crate::game::AgentRuntime;
use crate::models::{
    paginate, LikeResult, MentionedPost, PostedTweet, Thread, ThreadPost, TweetAnalytics,
    TweetMention,
};
use crate::twitter::{
    format_mentions, normalize_username, sanitize_for_logging, Tweet, TweetList, TwitterApi,
    MAX_PAGE_SIZE, MIN_SEARCH_PAGE_SIZE,
};

const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Clone)]
pub struct XService {
    twitter: Arc<dyn TwitterApi>,
    agent: Arc<dyn AgentRuntime>,
}

/// Author fields of `tweet`, resolved from the list's expanded users.
fn author_of(list: &TweetList, tweet: &Tweet) -> (String, String, String) {
    let author_id = tweet.author_id.clone().unwrap_or_default();
    match list.author(&author_id) {
        Some(user) => (author_id, user.username.clone(), user.name.clone()),
        None => (
            author_id,
            UNKNOWN_AUTHOR.to_string(),
            UNKNOWN_AUTHOR.to_string(),
        ),
    }
}

fn compose(content: &str, mentions: Option<&[String]>) -> Result<String, ServiceError> {
    if content.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "Tweet content must not be empty".to_string(),
        ));
    }
    format_mentions(content, mentions.unwrap_or(&[]))
        .map_err(|bad| ServiceError::InvalidInput(format!("Invalid mention '{}'", bad)))
}

impl XService {
    pub fn new(twitter: Arc<dyn TwitterApi>, agent: Arc<dyn AgentRuntime>) -> Self {
        Self { twitter, agent }
    }

    /// Lists the authenticated user's recent tweets as threads.
    ///
    /// The agent is stepped once first; its outcome is logged and otherwise unused.
    pub async fn list_threads(&self, page: u32, limit: u32) -> Result<Vec<Thread>, ServiceError> {
        const OP: &str = "fetch threads";
        info!("Listing threads (page {}, limit {})", page, limit);

        let outcome = self
            .agent
            .step()
            .await
            .map_err(|e| ServiceError::from_agent(OP, e))?;
        debug!("Step response: {:?}", outcome);

        let me = self
            .twitter
            .me()
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        let timeline = self
            .twitter
            .user_timeline(&me.id, MAX_PAGE_SIZE)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;

        if timeline.data.is_empty() {
            info!("No tweets found, returning empty list");
            return Ok(Vec::new());
        }

        let threads: Vec<Thread> = timeline
            .data
            .into_iter()
            .map(|tweet| Thread {
                id: tweet.id,
                title: tweet.text,
            })
            .collect();
        info!("Converted {} tweets to threads", threads.len());

        Ok(paginate(threads, page, limit))
    }

    /// Posts a tweet, appending `@mentions` after a blank line when given.
    pub async fn post_tweet(
        &self,
        content: &str,
        mentions: Option<&[String]>,
    ) -> Result<PostedTweet, ServiceError> {
        const OP: &str = "post tweet";
        let text = compose(content, mentions)?;
        info!("Posting tweet: '{}'", sanitize_for_logging(&text, 100));

        let tweet = self
            .twitter
            .tweet(&text)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        info!("Tweet posted: {}", tweet.id);

        Ok(PostedTweet {
            id: tweet.id,
            text: tweet.text,
        })
    }

    /// Posts `posts` as a thread: the first as a tweet, each following one as a reply
    /// to the post before it.
    pub async fn post_thread(&self, posts: &[ThreadPost]) -> Result<Vec<PostedTweet>, ServiceError> {
        const OP: &str = "post thread";
        if posts.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Thread must contain at least one post".to_string(),
            ));
        }

        // Validate everything before the first post goes out.
        let texts = posts
            .iter()
            .map(|p| compose(&p.content, p.mentions.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Posting thread of {} posts", texts.len());

        let mut posted: Vec<PostedTweet> = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let result = match posted.last() {
                None => self.twitter.tweet(text).await,
                Some(previous) => self.twitter.reply(text, &previous.id).await,
            };
            let tweet = result.map_err(|e| ServiceError::from_twitter(OP, e))?;
            info!("Thread post {}/{} posted: {}", i + 1, texts.len(), tweet.id);
            posted.push(PostedTweet {
                id: tweet.id,
                text: tweet.text,
            });
        }

        Ok(posted)
    }

    pub async fn reply_to_tweet(
        &self,
        tweet_id: &str,
        content: &str,
    ) -> Result<PostedTweet, ServiceError> {
        const OP: &str = "reply to tweet";
        let text = compose(content, None)?;
        info!("Replying to tweet {}", tweet_id);

        let tweet = self
            .twitter
            .reply(&text, tweet_id)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        info!("Reply posted: {}", tweet.id);

        Ok(PostedTweet {
            id: tweet.id,
            text: tweet.text,
        })
    }

    /// Likes a tweet as the authenticated user.
    pub async fn like_tweet(&self, tweet_id: &str) -> Result<LikeResult, ServiceError> {
        const OP: &str = "like tweet";
        let me = self
            .twitter
            .me()
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        let liked = self
            .twitter
            .like(&me.id, tweet_id)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        info!("Tweet {} liked: {}", tweet_id, liked);

        Ok(LikeResult {
            tweet_id: tweet_id.to_string(),
            liked,
        })
    }

    pub async fn get_tweet_analytics(&self, tweet_id: &str) -> Result<TweetAnalytics, ServiceError> {
        const OP: &str = "fetch tweet analytics";
        let tweet = self
            .twitter
            .single_tweet(tweet_id)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?
            .ok_or_else(|| ServiceError::NotFound(format!("Tweet {} not found", tweet_id)))?;

        let metrics = tweet.public_metrics.unwrap_or_default();
        Ok(TweetAnalytics {
            id: tweet.id,
            text: tweet.text,
            likes: metrics.like_count,
            retweets: metrics.retweet_count,
            replies: metrics.reply_count,
            views: metrics.impression_count,
            created_at: tweet.created_at,
        })
    }

    /// Lists tweets mentioning the authenticated user.
    pub async fn get_mentions(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<TweetMention>, ServiceError> {
        const OP: &str = "fetch mentions";
        let me = self
            .twitter
            .me()
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;
        let list = self
            .twitter
            .user_mention_timeline(&me.id, MAX_PAGE_SIZE)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;

        let mentions: Vec<TweetMention> = list
            .data
            .iter()
            .map(|tweet| {
                let (author_id, author_username, author_name) = author_of(&list, tweet);
                TweetMention {
                    id: tweet.id.clone(),
                    text: tweet.text.clone(),
                    author_id,
                    author_username,
                    author_name,
                    created_at: tweet.created_at.clone(),
                }
            })
            .collect();
        info!("Found {} mentions of @{}", mentions.len(), me.username);

        Ok(paginate(mentions, page, limit))
    }

    /// Finds recent posts mentioning `username`, at most `limit` of them.
    pub async fn search_user_mentions(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<MentionedPost>, ServiceError> {
        const OP: &str = "search user mentions";
        let username = normalize_username(username)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Invalid username '{}'", username)))?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let user = self
            .twitter
            .user_by_username(&username)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?
            .ok_or_else(|| ServiceError::NotFound(format!("User @{} not found", username)))?;

        let max_results = limit.clamp(MIN_SEARCH_PAGE_SIZE, MAX_PAGE_SIZE);
        let list = self
            .twitter
            .search(&format!("@{}", user.username), max_results)
            .await
            .map_err(|e| ServiceError::from_twitter(OP, e))?;

        let posts: Vec<MentionedPost> = list
            .data
            .iter()
            .take(limit as usize)
            .map(|tweet| {
                let (_, author_username, author_name) = author_of(&list, tweet);
                MentionedPost {
                    tweet_id: tweet.id.clone(),
                    thread_id: tweet
                        .conversation_id
                        .clone()
                        .unwrap_or_else(|| tweet.id.clone()),
                    text: tweet.text.clone(),
                    author_username,
                    author_name,
                    created_at: tweet.created_at.clone(),
                }
            })
            .collect();
        info!("Found {} posts mentioning @{}", posts.len(), user.username);

        Ok(posts)
    }
}
