//! End-to-end tests for the server-rendered pages

mod common;

use common::{TestClient, TestServer, CALM_SONG_TITLE, CALM_TEXT, TEST_EMAIL, TEST_PASS};
use reqwest::StatusCode;

#[tokio::test]
async fn test_anonymous_home() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_page("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("Try the tool instantly below"));
    assert!(html.contains("href=\"/login\""));
}

#[tokio::test]
async fn test_anonymous_analysis_invites_login() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.submit_form("/analyze", &[("text", CALM_TEXT)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("<strong>CALM</strong>"));
    assert!(html.contains(CALM_SONG_TITLE));
    assert!(html.contains("Log in to save this recommendation to your history!"));
}

#[tokio::test]
async fn test_login_form_lands_on_authenticated_home() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .submit_form("/login", &[("email", TEST_EMAIL), ("password", TEST_PASS)])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/");

    let html = response.text().await.unwrap();
    assert!(html.contains("Welcome back, Test User!"));
    assert!(html.contains("You haven&#x27;t requested any songs yet!"));

    let response = client.get_page("/login").await;
    assert_eq!(response.url().path(), "/");
}

#[tokio::test]
async fn test_failed_login_form() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .submit_form("/login", &[("email", TEST_EMAIL), ("password", "nope")])
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Login failed. Check credentials."));
}

#[tokio::test]
async fn test_signup_form_leads_to_login() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .submit_form(
            "/signup",
            &[
                ("name", "Jane"),
                ("email", "jane@example.com"),
                ("age", "25"),
                ("password", "password123"),
                ("confirm_password", "password123"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let html = response.text().await.unwrap();
    assert!(html.contains("Account created successfully!"));
    assert!(html.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_signup_form_with_mismatched_passwords() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .submit_form(
            "/signup",
            &[
                ("name", "Jane"),
                ("email", "jane@example.com"),
                ("age", "25"),
                ("password", "password123"),
                ("confirm_password", "password999"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = response.text().await.unwrap();
    assert!(html.contains("Passwords do not match. Please retype."));
    assert!(html.contains("value=\"Jane\""));
}

#[tokio::test]
async fn test_logged_in_analysis_shows_history() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated(server.base_url.clone()).await;

    let response = client.submit_form("/analyze", &[("text", CALM_TEXT)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("Interaction logged successfully and saved to history."));
    assert!(html.contains("<td>Sitting by the lake, feeling s...</td>"));
}

#[tokio::test]
async fn test_logout_form_returns_to_anonymous_home() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated(server.base_url.clone()).await;

    let response = client.submit_form("/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/");
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Try the tool instantly below"));

    let response = client.get_history().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
