use super::auth::{AuthToken, AuthTokenValue, UserAuthCredentials};
use super::user_models::{InteractionRecord, NewUser, User};
use crate::mood::MoodLabel;
use anyhow::Result;

pub trait UserAuthCredentialsStore: Send + Sync {
    /// Returns the user's authentication credentials given the user id.
    /// Returns Ok(None) if the user does not exist.
    /// Returns Err if there is a database error.
    fn get_user_auth_credentials(&self, user_id: usize) -> Result<Option<UserAuthCredentials>>;

    /// Records a verification attempt, `succeeded` also bumps last_used.
    fn touch_user_password_credentials(&self, user_id: usize, succeeded: bool) -> Result<()>;
}

pub trait UserAuthTokenStore: Send + Sync {
    /// Returns a user's authentication token given an AuthTokenValue.
    /// Returns Ok(None) if the token does not exist.
    fn get_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Deletes an auth token given the token value.
    /// Returns Ok(None) if the token does not exist.
    fn delete_user_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn update_user_auth_token_last_used_timestamp(&self, token: &AuthTokenValue) -> Result<()>;

    fn add_user_auth_token(&self, token: AuthToken) -> Result<()>;

    fn get_all_user_auth_tokens(&self, user_id: usize) -> Result<Vec<AuthToken>>;
}

/// Append-only record of recommendations shown to logged-in users.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait InteractionLog: Send + Sync {
    fn append(&self, user_id: usize, input_text: &str, mood: MoodLabel, song_id: &str)
        -> Result<()>;

    /// At most `limit` records for `user_id`, newest first.
    fn recent(&self, user_id: usize, limit: usize) -> Result<Vec<InteractionRecord>>;
}

pub trait UserStore:
    UserAuthTokenStore + UserAuthCredentialsStore + InteractionLog + Send + Sync
{
    /// Creates a new user and returns the user id.
    fn create_user(&self, new_user: &NewUser) -> Result<usize>;

    /// Creates a user and its password credentials in one transaction,
    /// either both rows are written or neither is.
    fn create_user_with_password(&self, new_user: &NewUser, password: &str) -> Result<usize>;

    fn set_user_external_id(&self, user_id: usize, external_id: &str) -> Result<()>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: usize) -> Result<Option<User>>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<User>>;

    fn users_count(&self) -> Result<usize>;
}
