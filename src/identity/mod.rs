//! Account creation and credential checks.
//!
//! Both backends share the same sign-up validation and produce an [`Account`]
//! keyed by the local user id, so interaction history works the same way
//! whichever backend is configured.

mod local;
mod remote;

pub use local::LocalIdentityProvider;
pub use remote::RemoteIdentityProvider;

use crate::user::{username_from_email, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Sign-up error: a user with this email already exists.")]
    AccountExists,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Identity backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Account {
    pub user_id: usize,
    pub email: String,
    pub username: String,
    pub name: String,
}

impl From<User> for Account {
    fn from(user: User) -> Self {
        Account {
            user_id: user.id,
            email: user.email,
            username: user.username,
            name: user.name,
        }
    }
}

impl NewAccount {
    pub fn username(&self) -> String {
        username_from_email(&self.email)
    }

    /// Trims the name and the email. Passwords are taken as typed.
    pub fn normalized(self) -> Self {
        NewAccount {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), IdentityError> {
        let required = [&self.name, &self.email, &self.password, &self.confirm_password];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(IdentityError::InvalidInput(
                "Please fill all required fields.".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(IdentityError::InvalidInput(
                "Please enter a valid email address.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(IdentityError::InvalidInput(
                "Passwords do not match. Please retype.".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::InvalidInput(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LENGTH
            )));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(IdentityError::InvalidInput(format!(
                "Age must be between {} and {}.",
                MIN_AGE, MAX_AGE
            )));
        }
        Ok(())
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn create_account(&self, account: NewAccount) -> Result<Account, IdentityError>;

    /// Ok(None) when the email is unknown or the password is wrong.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, IdentityError>;
}
