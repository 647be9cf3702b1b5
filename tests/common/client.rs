//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client logged in as the test user
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(TEST_EMAIL, TEST_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Test user authentication failed: {:?}",
            response.text().await
        );

        client
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// GET /v1/
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/v1/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /v1/auth/login
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(format!("{}/v1/auth/login", self.base_url))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST /v1/auth/signup
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        age: u32,
        password: &str,
        confirm_password: &str,
    ) -> Response {
        self.client
            .post(format!("{}/v1/auth/signup", self.base_url))
            .json(&json!({
                "name": name,
                "email": email,
                "age": age,
                "password": password,
                "confirm_password": confirm_password,
            }))
            .send()
            .await
            .expect("Signup request failed")
    }

    /// GET /v1/auth/logout
    pub async fn logout(&self) -> Response {
        self.client
            .get(format!("{}/v1/auth/logout", self.base_url))
            .send()
            .await
            .expect("Logout request failed")
    }

    // ========================================================================
    // Mood Endpoints
    // ========================================================================

    /// POST /v1/mood/classify
    pub async fn classify(&self, text: &str) -> Response {
        self.client
            .post(format!("{}/v1/mood/classify", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Classify request failed")
    }

    /// POST /v1/mood/recommend
    pub async fn recommend(&self, text: &str) -> Response {
        self.client
            .post(format!("{}/v1/mood/recommend", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Recommend request failed")
    }

    // ========================================================================
    // User Endpoints
    // ========================================================================

    /// GET /v1/user/history
    pub async fn get_history(&self) -> Response {
        self.client
            .get(format!("{}/v1/user/history", self.base_url))
            .send()
            .await
            .expect("History request failed")
    }

    // ========================================================================
    // HTML Pages
    // ========================================================================

    /// GET on a page path, following redirects
    pub async fn get_page(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Page request failed")
    }

    /// POST a form to a page path, following redirects
    pub async fn submit_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .form(fields)
            .send()
            .await
            .expect("Form submission failed")
    }
}
