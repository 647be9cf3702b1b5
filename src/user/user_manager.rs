use crate::catalog::SongCatalog;
use crate::mood::MoodLabel;

use super::{
    AuthToken, AuthTokenValue, HistoryEntry, InteractionLog, InteractionRecord, NewUser,
    User, UserStore,
};
use anyhow::{bail, Result};
use std::{
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tracing::{debug, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

pub struct UserManager {
    catalog: Arc<dyn SongCatalog>,
    user_store: Arc<Mutex<Box<dyn UserStore>>>,
    history_limit: usize,
}

impl UserManager {
    pub fn new(catalog: Arc<dyn SongCatalog>, user_store: Box<dyn UserStore>) -> Self {
        Self {
            catalog,
            user_store: Arc::new(Mutex::new(user_store)),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn add_user(&self, new_user: &NewUser) -> Result<usize> {
        if new_user.email.trim().is_empty() {
            bail!("The user email cannot be empty.")
        }

        let locked_store = self.user_store.lock().unwrap();
        if locked_store.get_user_by_email(&new_user.email)?.is_some() {
            bail!("User with email {} already exists.", new_user.email);
        }

        locked_store.create_user(new_user)
    }

    /// Like [Self::add_user], but the password credentials are written in
    /// the same transaction as the user.
    pub fn add_user_with_password(&self, new_user: &NewUser, password: &str) -> Result<usize> {
        if new_user.email.trim().is_empty() {
            bail!("The user email cannot be empty.")
        }

        let locked_store = self.user_store.lock().unwrap();
        if locked_store.get_user_by_email(&new_user.email)?.is_some() {
            bail!("User with email {} already exists.", new_user.email);
        }

        locked_store.create_user_with_password(new_user, password)
    }

    pub fn link_external_id(&self, user_id: usize, external_id: &str) -> Result<()> {
        let locked_store = self.user_store.lock().unwrap();
        if let Some(owner) = locked_store.get_user_by_external_id(external_id)? {
            if owner.id != user_id {
                bail!(
                    "External id {} already belongs to user {}.",
                    external_id,
                    owner.id
                );
            }
            return Ok(());
        }
        locked_store.set_user_external_id(user_id, external_id)
    }

    pub fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        self.user_store.lock().unwrap().get_user(user_id)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_store.lock().unwrap().get_user_by_email(email)
    }

    pub fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        self.user_store
            .lock()
            .unwrap()
            .get_user_by_external_id(external_id)
    }

    pub fn users_count(&self) -> Result<usize> {
        self.user_store.lock().unwrap().users_count()
    }

    /// Ok(None) for an unknown email, a user without a password, or a wrong
    /// password alike.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user_store = self.user_store.lock().unwrap();
        let Some(user) = user_store.get_user_by_email(email)? else {
            debug!("Login attempt for unknown email");
            return Ok(None);
        };
        let Some(password_credentials) = user_store
            .get_user_auth_credentials(user.id)?
            .and_then(|c| c.username_password)
        else {
            debug!("User {} has no password credentials", user.id);
            return Ok(None);
        };

        let matches = password_credentials.matches(password)?;
        user_store.touch_user_password_credentials(user.id, matches)?;
        Ok(matches.then_some(user))
    }

    pub fn generate_auth_token(&self, user_id: usize) -> Result<AuthToken> {
        let token = AuthToken {
            user_id,
            value: AuthTokenValue::generate(),
            created: SystemTime::now(),
            last_used: None,
        };
        self.user_store
            .lock()
            .unwrap()
            .add_user_auth_token(token.clone())?;
        Ok(token)
    }

    pub fn get_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        self.user_store.lock().unwrap().get_user_auth_token(value)
    }

    pub fn update_auth_token_last_used(&self, value: &AuthTokenValue) -> Result<()> {
        self.user_store
            .lock()
            .unwrap()
            .update_user_auth_token_last_used_timestamp(value)
    }

    /// Deletes the token only if `user_id` owns it.
    pub fn delete_auth_token(&self, user_id: usize, token_value: &AuthTokenValue) -> Result<()> {
        let user_store = self.user_store.lock().unwrap();
        match user_store.get_user_auth_token(token_value)? {
            Some(token) if token.user_id == user_id => {
                user_store.delete_user_auth_token(token_value)?;
                Ok(())
            }
            Some(token) => bail!(
                "Tried to delete auth token, but the authenticated user {} was not the owner {} of the token.",
                user_id,
                token.user_id
            ),
            None => bail!("Did not find auth token"),
        }
    }

    pub fn log_interaction(
        &self,
        user_id: usize,
        input_text: &str,
        mood: MoodLabel,
        song_id: &str,
    ) -> Result<()> {
        self.user_store
            .lock()
            .unwrap()
            .append(user_id, input_text, mood, song_id)
    }

    /// The last `history_limit` interactions of the user, newest first, joined
    /// with the catalog.
    pub fn get_history(&self, user_id: usize) -> Result<Vec<HistoryEntry>> {
        let records = self
            .user_store
            .lock()
            .unwrap()
            .recent(user_id, self.history_limit)?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records.iter() {
            let song = match self.catalog.get_song(&record.song_id) {
                Ok(song) => song,
                Err(err) => {
                    warn!("Could not look up song {}: {}", record.song_id, err);
                    None
                }
            };
            entries.push(HistoryEntry::new(record, song.as_ref()));
        }
        Ok(entries)
    }
}

impl InteractionLog for UserManager {
    fn append(
        &self,
        user_id: usize,
        input_text: &str,
        mood: MoodLabel,
        song_id: &str,
    ) -> Result<()> {
        self.log_interaction(user_id, input_text, mood, song_id)
    }

    fn recent(&self, user_id: usize, limit: usize) -> Result<Vec<InteractionRecord>> {
        self.user_store.lock().unwrap().recent(user_id, limit)
    }
}
