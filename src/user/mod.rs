pub mod auth;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{AuthToken, AuthTokenValue, UserAuthCredentials, UsernamePasswordCredentials};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::{UserManager, DEFAULT_HISTORY_LIMIT};
pub use user_models::{username_from_email, HistoryEntry, InteractionRecord, NewUser, User};
#[cfg(any(test, feature = "mock"))]
pub use user_store::MockInteractionLog;
pub use user_store::{InteractionLog, UserAuthCredentialsStore, UserAuthTokenStore, UserStore};
