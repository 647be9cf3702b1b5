use super::{Account, IdentityError, IdentityProvider, NewAccount};
use crate::user::{NewUser, User, UserManager};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    email_address: [&'a str; 1],
    password: &'a str,
    first_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyPasswordResponse {
    verified: bool,
}

/// Identity REST service authenticated with a bearer secret key.
///
/// Remote accounts are mirrored into the local user db, keyed by the remote
/// id, so the rest of the app only deals with local user ids.
pub struct RemoteIdentityProvider {
    client: Client,
    base_url: String,
    secret_key: String,
    user_manager: Arc<UserManager>,
}

impl RemoteIdentityProvider {
    pub fn new(
        base_url: &str,
        secret_key: String,
        timeout: Duration,
        user_manager: Arc<UserManager>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            user_manager,
        })
    }

    async fn find_remote_user(&self, email: &str) -> Result<Option<RemoteUser>> {
        let url = format!("{}/v1/users", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("email_address", email)])
            .send()
            .await
            .context("Failed to query identity service")?;

        if !response.status().is_success() {
            bail!("User lookup failed with status: {}", response.status());
        }

        let users: Vec<RemoteUser> = response
            .json()
            .await
            .context("Failed to parse user lookup response")?;
        Ok(users.into_iter().next())
    }

    async fn create_remote_user(&self, account: &NewAccount) -> Result<RemoteUser> {
        let url = format!("{}/v1/users", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&CreateUserRequest {
                email_address: [account.email.as_str()],
                password: account.password.as_str(),
                first_name: account.name.as_str(),
            })
            .send()
            .await
            .context("Failed to reach identity service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("User creation failed with status {}: {}", status, body));
        }
        response
            .json()
            .await
            .context("Failed to parse user creation response")
    }

    async fn verify_remote_password(&self, remote_id: &str, password: &str) -> Result<bool> {
        let url = format!(
            "{}/v1/users/{}/verify_password",
            self.base_url,
            urlencoding::encode(remote_id)
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&json!({ "password": password }))
            .send()
            .await
            .context("Failed to reach identity service")?;

        let status = response.status();
        // Wrong passwords come back as a client error, not as verified=false.
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            return Ok(false);
        }
        if !status.is_success() {
            bail!("Password verification failed with status: {}", status);
        }
        let verification: VerifyPasswordResponse = response
            .json()
            .await
            .context("Failed to parse password verification response")?;
        Ok(verification.verified)
    }

    /// Local user for `remote`. A local user with the same email and no
    /// external id gets linked, otherwise one is created on first sight.
    fn mirror_user(&self, remote: &RemoteUser, email: &str, age: Option<u32>) -> Result<User> {
        if let Some(user) = self.user_manager.get_user_by_external_id(&remote.id)? {
            return Ok(user);
        }
        if let Some(local) = self.user_manager.get_user_by_email(email)? {
            if let Some(other) = &local.external_id {
                bail!(
                    "User {} is linked to remote account {}, not {}",
                    local.id,
                    other,
                    remote.id
                );
            }
            self.user_manager.link_external_id(local.id, &remote.id)?;
            info!("Linked remote account {} to user {}", remote.id, local.id);
            return self
                .user_manager
                .get_user(local.id)?
                .context("Linked user disappeared");
        }
        let name = remote
            .first_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| crate::user::username_from_email(email));
        let user_id = self.user_manager.add_user(&NewUser {
            email: email.to_string(),
            name,
            age,
            external_id: Some(remote.id.clone()),
        })?;
        info!("Mirrored remote account {} as user {}", remote.id, user_id);
        self.user_manager
            .get_user(user_id)?
            .context("Mirrored user disappeared")
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    fn name(&self) -> &str {
        "remote"
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, IdentityError> {
        let account = account.normalized();
        account.validate()?;
        if self.find_remote_user(&account.email).await?.is_some()
            || self.user_manager.get_user_by_email(&account.email)?.is_some()
        {
            return Err(IdentityError::AccountExists);
        }

        let remote = self.create_remote_user(&account).await?;
        let user = self.mirror_user(&remote, &account.email, Some(account.age))?;
        Ok(Account::from(user))
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, IdentityError> {
        let email = email.trim();
        let Some(remote) = self.find_remote_user(email).await? else {
            debug!("No remote account for login attempt");
            return Ok(None);
        };
        if !self.verify_remote_password(&remote.id, password).await? {
            return Ok(None);
        }
        let user = self.mirror_user(&remote, email, None)?;
        Ok(Some(Account::from(user)))
    }
}
