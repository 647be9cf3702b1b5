//! Moodwave library
//!
//! Mood classification, song recommendation and the account plumbing shared
//! by the web server and the console chat.

pub mod catalog;
pub mod chat;
pub mod cli_style;
pub mod config;
pub mod identity;
pub mod mood;
pub mod navigation;
pub mod recommendation;
pub mod sentiment;
pub mod server;
pub mod services;
pub mod sqlite_persistence;
pub mod user;

pub use config::{AppConfig, CliArgs};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use services::Services;
