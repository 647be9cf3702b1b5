//! Sentiment polarity providers.
//!
//! The mood classifier only needs a single number in [-1.0, 1.0] for a piece
//! of text. Two backends are available: an embedded word lexicon that works
//! offline, and an HTTP client for an external scoring service.

mod http_client;
mod lexicon;

pub use http_client::HttpSentimentAnalyzer;
pub use lexicon::LexiconSentimentAnalyzer;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Sentiment service timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Sentiment service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Polarity {0} outside [-1, 1]")]
    OutOfRange(f64),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    /// Polarity of `text`, from -1.0 (negative) to 1.0 (positive).
    async fn polarity(&self, text: &str) -> Result<f64, SentimentError>;
}
