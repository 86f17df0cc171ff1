//! Tweet Posting Script
//!
//! Posts a single tweet through the GAME Twitter proxy, without starting the server.
//! The access token is read from `GAME_TWITTER_ACCESS_TOKEN` or prompted for; the
//! message and optional mentions are prompted for.

use std::env;
use std::io::{self, Write};

use threadsbot::config::DEFAULT_X_API_BASE_URL;
use threadsbot::twitter::{format_mentions, TwitterClient};

/// Prints `label` and reads one trimmed line from stdin.
fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🐦 Tweet Posting Tool");
    println!("=====================");

    let access_token = match env::var("GAME_TWITTER_ACCESS_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            println!("🔑 Using GAME_TWITTER_ACCESS_TOKEN from environment");
            token.trim().to_string()
        }
        _ => prompt("🔑 Enter your GAME Twitter access token: ")?,
    };
    if access_token.is_empty() {
        println!("❌ Access token cannot be empty!");
        return Err("Access token is required".into());
    }

    let tweet_text = prompt("📝 Enter your tweet message: ")?;
    if tweet_text.is_empty() {
        println!("❌ Tweet message cannot be empty!");
        return Err("Tweet message is required".into());
    }

    let mentions: Vec<String> = prompt("👥 Mentions (space separated, optional): ")?
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();
    let text = format_mentions(&tweet_text, &mentions)
        .map_err(|bad| format!("Invalid mention '{}'", bad))?;

    // Twitter's limit is 280 characters
    if text.chars().count() > 280 {
        println!(
            "❌ Tweet is too long! {} characters (max 280)",
            text.chars().count()
        );
        return Err("Tweet exceeds 280 character limit".into());
    }
    println!("📏 Tweet length: {} characters", text.chars().count());

    let base_url = env::var("X_API_BASE_URL").unwrap_or_else(|_| DEFAULT_X_API_BASE_URL.to_string());
    let client = TwitterClient::new(&base_url, &access_token);

    println!("\n🚀 Posting your tweet...");
    match client.post_tweet(&text).await {
        Ok(tweet) => {
            println!("\n🎉 Success! Your tweet has been posted.");
            println!("🆔 Tweet id: {}", tweet.id);
        }
        Err(e) => {
            println!("\n💥 Failed to post tweet: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
