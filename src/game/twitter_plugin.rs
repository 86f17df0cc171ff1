//! Twitter worker for the GAME agent.
//!
//! Exposes posting, replying, liking and searching as agent functions, all backed by
//! the same [`TwitterApi`] handle the HTTP service uses.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::function::{
    ExecutableGameFunctionResponse, FunctionArg, FunctionArgs, FunctionExecutable, GameFunction,
    GameWorker,
};
use crate::twitter::{sanitize_for_logging, TwitterApi};

pub const TWITTER_WORKER_ID: &str = "twitter_worker";

#[derive(Debug, Clone, Copy)]
enum TwitterAction {
    PostTweet,
    ReplyTweet,
    LikeTweet,
    SearchTweets,
}

struct TwitterFunction {
    twitter: Arc<dyn TwitterApi>,
    action: TwitterAction,
}

impl TwitterFunction {
    async fn run(&self, args: &FunctionArgs) -> Result<String, ExecutableGameFunctionResponse> {
        match self.action {
            TwitterAction::PostTweet => {
                let tweet = args.require("tweet")?;
                if let Some(reasoning) = args.get("tweet_reasoning") {
                    log::info!("Tweet reasoning: {}", sanitize_for_logging(&reasoning, 200));
                }
                let posted = self.twitter.tweet(&tweet).await.map_err(failed)?;
                Ok(format!("Tweet posted successfully with id {}", posted.id))
            }
            TwitterAction::ReplyTweet => {
                let tweet_id = args.require("tweet_id")?;
                let reply = args.require("reply")?;
                let posted = self.twitter.reply(&reply, &tweet_id).await.map_err(failed)?;
                Ok(format!("Replied to tweet {} with tweet {}", tweet_id, posted.id))
            }
            TwitterAction::LikeTweet => {
                let tweet_id = args.require("tweet_id")?;
                let me = self.twitter.me().await.map_err(failed)?;
                self.twitter.like(&me.id, &tweet_id).await.map_err(failed)?;
                Ok(format!("Liked tweet {}", tweet_id))
            }
            TwitterAction::SearchTweets => {
                let query = args.require("query")?;
                let found = self.twitter.search(&query, 10).await.map_err(failed)?;
                let summary: Vec<_> = found
                    .data
                    .iter()
                    .map(|t| json!({ "tweet_id": t.id, "content": t.text }))
                    .collect();
                Ok(json!(summary).to_string())
            }
        }
    }
}

fn failed(e: crate::twitter::TwitterError) -> ExecutableGameFunctionResponse {
    ExecutableGameFunctionResponse::failed(e.to_string())
}

#[async_trait]
impl FunctionExecutable for TwitterFunction {
    async fn execute(&self, args: &FunctionArgs) -> ExecutableGameFunctionResponse {
        match self.run(args).await {
            Ok(feedback) => ExecutableGameFunctionResponse::done(feedback),
            Err(failed) => failed,
        }
    }
}

fn function(
    twitter: &Arc<dyn TwitterApi>,
    action: TwitterAction,
    name: &str,
    description: &str,
    args: Vec<FunctionArg>,
) -> GameFunction {
    GameFunction::new(
        name,
        description,
        args,
        Arc::new(TwitterFunction {
            twitter: Arc::clone(twitter),
            action,
        }),
    )
}

/// Builds the worker the agent uses to act on Twitter.
pub fn twitter_worker(twitter: Arc<dyn TwitterApi>) -> GameWorker {
    let functions = vec![
        function(
            &twitter,
            TwitterAction::PostTweet,
            "post_tweet",
            "Post a tweet",
            vec![
                FunctionArg::new("tweet", "The tweet content"),
                FunctionArg::new("tweet_reasoning", "The reasoning behind the tweet"),
            ],
        ),
        function(
            &twitter,
            TwitterAction::ReplyTweet,
            "reply_tweet",
            "Reply to a tweet",
            vec![
                FunctionArg::new("tweet_id", "The id of the tweet to reply to"),
                FunctionArg::new("reply", "The reply content"),
                FunctionArg::new("reply_reasoning", "The reasoning behind the reply"),
            ],
        ),
        function(
            &twitter,
            TwitterAction::LikeTweet,
            "like_tweet",
            "Like a tweet",
            vec![FunctionArg::new("tweet_id", "The id of the tweet to like")],
        ),
        function(
            &twitter,
            TwitterAction::SearchTweets,
            "search_tweets",
            "Search recent tweets",
            vec![FunctionArg::new("query", "The search query")],
        ),
    ];

    GameWorker::new(
        TWITTER_WORKER_ID,
        "Twitter Worker",
        "Posts, replies to, likes and searches tweets",
        functions,
    )
}
