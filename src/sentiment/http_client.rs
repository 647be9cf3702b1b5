use super::{SentimentAnalyzer, SentimentError};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct PolarityRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct PolarityResponse {
    polarity: f64,
}

/// Client for an external polarity scoring service.
///
/// Sends `POST {url}` with `{"text": ...}` and expects `{"polarity": <f64>}`
/// back, with the value inside [-1.0, 1.0].
pub struct HttpSentimentAnalyzer {
    client: Client,
    url: String,
}

impl HttpSentimentAnalyzer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SentimentAnalyzer for HttpSentimentAnalyzer {
    fn name(&self) -> &str {
        "http"
    }

    async fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        debug!(url = %self.url, text_len = text.len(), "Requesting sentiment polarity");

        let response = self
            .client
            .post(&self.url)
            .json(&PolarityRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SentimentError::Timeout
                } else {
                    SentimentError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: PolarityResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SentimentError::Timeout
            } else {
                SentimentError::InvalidResponse(format!("Failed to parse polarity: {}", e))
            }
        })?;

        if !parsed.polarity.is_finite() || !(-1.0..=1.0).contains(&parsed.polarity) {
            return Err(SentimentError::OutOfRange(parsed.polarity));
        }

        Ok(parsed.polarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn analyzer(server: &MockServer, timeout: Duration) -> HttpSentimentAnalyzer {
        HttpSentimentAnalyzer::new(server.url("/polarity"), timeout).unwrap()
    }

    #[tokio::test]
    async fn returns_polarity_from_service() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/polarity")
                .json_body(json!({"text": "What a lovely day"}));
            then.status(200).json_body(json!({"polarity": 0.62}));
        });

        let polarity = analyzer(&server, Duration::from_secs(2))
            .polarity("What a lovely day")
            .await
            .unwrap();

        mock.assert();
        assert!((polarity - 0.62).abs() < 1e-9);
    }

    #[tokio::test]
    async fn maps_error_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/polarity");
            then.status(503).body("overloaded");
        });

        let err = analyzer(&server, Duration::from_secs(2))
            .polarity("anything")
            .await
            .unwrap_err();

        match err {
            SentimentError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_polarity() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/polarity");
            then.status(200).json_body(json!({"polarity": 3.5}));
        });

        let err = analyzer(&server, Duration::from_secs(2))
            .polarity("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, SentimentError::OutOfRange(_)));
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/polarity");
            then.status(200).json_body(json!({"score": 0.1}));
        });

        let err = analyzer(&server, Duration::from_secs(2))
            .polarity("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, SentimentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn times_out_on_slow_service() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/polarity");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({"polarity": 0.0}));
        });

        let err = analyzer(&server, Duration::from_millis(50))
            .polarity("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, SentimentError::Timeout));
    }
}
