//! User lookups for Twitter API.

use log::{info, warn};

use super::api::{TwitterClient, TwitterError};
use super::types::{Single, User};

impl TwitterClient {
    /// Returns the user the access token belongs to (`GET /2/users/me`).
    pub async fn lookup_me(&self) -> Result<User, TwitterError> {
        let single: Single<User> = self.send(self.get("/2/users/me"), "me").await?;
        match single.data {
            Some(user) => {
                info!("Authenticated as {} (@{})", user.id, user.username);
                Ok(user)
            }
            None => Err(TwitterError::Api {
                status: 401,
                message: "authenticated user could not be resolved".to_string(),
                rate_limit_reset: None,
            }),
        }
    }

    /// Looks up a user by username (`GET /2/users/by/username/:username`).
    ///
    /// Returns `Ok(None)` when the user does not exist.
    pub async fn lookup_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, TwitterError> {
        info!("Looking up user by username: {}", username);

        let path = format!("/2/users/by/username/{}", urlencoding::encode(username));
        let request = self.get(&path).query(&[("user.fields", "username,name")]);
        let single: Single<User> = self.send(request, "user_by_username").await?;

        if single.data.is_none() {
            warn!("User {} not found", username);
        }
        Ok(single.data)
    }
}
