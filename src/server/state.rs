use axum::extract::FromRef;

use crate::identity::IdentityProvider;
use crate::recommendation::Recommender;
use crate::services::Services;
use crate::user::UserManager;
use std::sync::Arc;
use std::time::Instant;

use super::pages::Pages;
use super::ServerConfig;

pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedIdentityProvider = Arc<dyn IdentityProvider>;
pub type GuardedPages = Arc<Pages>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub user_manager: GuardedUserManager,
    pub identity: GuardedIdentityProvider,
    pub recommender: Recommender,
    pub pages: GuardedPages,
}

impl ServerState {
    pub fn new(config: ServerConfig, services: Services, pages: Pages) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            user_manager: services.user_manager,
            identity: services.identity,
            recommender: services.recommender,
            pages: Arc::new(pages),
        }
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedIdentityProvider {
    fn from_ref(input: &ServerState) -> Self {
        input.identity.clone()
    }
}

impl FromRef<ServerState> for Recommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for GuardedPages {
    fn from_ref(input: &ServerState) -> Self {
        input.pages.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
