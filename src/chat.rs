//! Console chat logic, independent of the terminal it runs in.

use crate::recommendation::{RecommendationOutcome, Recommender};
use crate::user::{HistoryEntry, UserManager};
use std::sync::Arc;

pub const AUTH_PROMPT: &str = "Type 'login' or 'signup'";
pub const INVALID_AUTH_OPTION: &str = "Invalid option. Please choose 'login' or 'signup'.";
pub const EMPTY_INPUT_REPLY: &str = "Please tell me something so I can help.";
pub const NO_SONG_REPLY: &str = "Sorry, I couldn't find a song for that mood.";
pub const GOODBYE_REPLY: &str = "Goodbye! Hope you feel better.";
pub const EXIT_HINT: &str = "Type 'quit' or 'exit' to end the conversation.";

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthChoice {
    Login,
    Signup,
    Exit,
    Invalid,
}

impl AuthChoice {
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "login" => AuthChoice::Login,
            "signup" => AuthChoice::Signup,
            word if EXIT_WORDS.contains(&word) => AuthChoice::Exit,
            _ => AuthChoice::Invalid,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatInput {
    Exit,
    Blank,
    History,
    Logout,
    Text(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ChatInput::Blank;
        }
        let lower = trimmed.to_lowercase();
        if EXIT_WORDS.contains(&lower.as_str()) {
            return ChatInput::Exit;
        }
        match lower.as_str() {
            "history" => ChatInput::History,
            "logout" => ChatInput::Logout,
            _ => ChatInput::Text(line.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum ChatReply {
    Goodbye,
    AskAgain,
    LoggedOut,
    History(Vec<HistoryEntry>),
    Recommendation(RecommendationOutcome),
    Error(String),
}

/// A logged-in chat: every line becomes a reply.
pub struct ChatSession {
    recommender: Recommender,
    user_manager: Arc<UserManager>,
    user_id: usize,
}

impl ChatSession {
    pub fn new(recommender: Recommender, user_manager: Arc<UserManager>, user_id: usize) -> Self {
        Self {
            recommender,
            user_manager,
            user_id,
        }
    }

    pub fn user_id(&self) -> usize {
        self.user_id
    }

    pub async fn handle(&self, line: &str) -> ChatReply {
        match ChatInput::parse(line) {
            ChatInput::Exit => ChatReply::Goodbye,
            ChatInput::Blank => ChatReply::AskAgain,
            ChatInput::Logout => ChatReply::LoggedOut,
            ChatInput::History => match self.user_manager.get_history(self.user_id) {
                Ok(history) => ChatReply::History(history),
                Err(err) => ChatReply::Error(format!("Could not load history: {}", err)),
            },
            ChatInput::Text(text) => ChatReply::Recommendation(
                self.recommender
                    .recommend_and_log(Some(self.user_id), &text, self.user_manager.as_ref())
                    .await,
            ),
        }
    }
}
