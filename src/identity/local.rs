use super::{Account, IdentityError, IdentityProvider, NewAccount};
use crate::user::{NewUser, UserManager};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Accounts and Argon2 password credentials kept in the local user db.
pub struct LocalIdentityProvider {
    user_manager: Arc<UserManager>,
}

impl LocalIdentityProvider {
    pub fn new(user_manager: Arc<UserManager>) -> Self {
        Self { user_manager }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, IdentityError> {
        let account = account.normalized();
        account.validate()?;
        if self.user_manager.get_user_by_email(&account.email)?.is_some() {
            return Err(IdentityError::AccountExists);
        }

        let user_id = self.user_manager.add_user_with_password(
            &NewUser {
                email: account.email.clone(),
                name: account.name.clone(),
                age: Some(account.age),
                external_id: None,
            },
            &account.password,
        )?;
        info!("Created local account {} for {}", user_id, account.username());

        Ok(Account {
            user_id,
            email: account.email.clone(),
            username: account.username(),
            name: account.name,
        })
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, IdentityError> {
        let user = self.user_manager.verify_password(email.trim(), password)?;
        Ok(user.map(Account::from))
    }
}
