use anyhow::Result;
use std::time::Duration;

use tracing::{error, info};

use crate::identity::{IdentityError, NewAccount};
use crate::navigation::{NavAction, Page};
use crate::recommendation::{LogStatus, Recommendation, Recommender};
use crate::services::Services;
use crate::user::{AuthTokenValue, User};
use tower_http::services::ServeDir;

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::pages::{
    AnalysisView, FormView, HomeView, Pages, EMPTY_ANALYSIS_TEXT, LOGIN_FAILED, SIGNUP_EXISTS,
    SIGNUP_SUCCEEDED,
};
use super::session::{expired_session_cookie, session_cookie, Session};
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub session_token: Option<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginSuccessResponse {
    token: String,
    user_id: usize,
    name: String,
}

#[derive(Deserialize, Debug)]
struct TextBody {
    pub text: String,
}

#[derive(Deserialize, Debug)]
struct SignupForm {
    pub name: String,
    pub email: String,
    pub age: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// A missing or malformed age becomes 0, which fails validation.
    fn into_account(self) -> NewAccount {
        NewAccount {
            age: self.age.trim().parse().unwrap_or(0),
            name: self.name,
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

#[derive(Serialize)]
struct RecommendResponse<'a> {
    #[serde(flatten)]
    recommendation: &'a Recommendation,
    log_status: &'a LogStatus,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn html_page(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!("Failed to render page: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn session_user(state: &ServerState, session: Option<&Session>) -> Option<User> {
    let session = session?;
    match state.user_manager.get_user(session.user_id) {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to load user {}: {}", session.user_id, err);
            None
        }
    }
}

/// Home view for whoever holds `session`, history included.
fn home_view(state: &ServerState, session: Option<&Session>) -> HomeView {
    let Some(user) = session_user(state, session) else {
        return HomeView::default();
    };
    let history = match state.user_manager.get_history(user.id) {
        Ok(history) => history,
        Err(err) => {
            error!("Failed to load history of user {}: {}", user.id, err);
            vec![]
        }
    };
    HomeView {
        user_name: Some(user.name),
        history,
        ..Default::default()
    }
}

// JSON API

async fn get_stats(session: Option<Session>, State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        session_token: session.map(|s| s.token),
    })
}

async fn login(
    State(identity): State<GuardedIdentityProvider>,
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<LoginBody>,
) -> Response {
    let account = match identity.verify_credentials(&body.email, &body.password).await {
        Ok(Some(account)) => account,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(err) => {
            error!("Login failed with backend error: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    match user_manager.generate_auth_token(account.user_id) {
        Ok(auth_token) => {
            info!("User {} logged in", account.user_id);
            let cookie = session_cookie(&auth_token.value.0);
            (
                StatusCode::CREATED,
                [(header::SET_COOKIE, cookie.to_string())],
                Json(LoginSuccessResponse {
                    token: auth_token.value.0,
                    user_id: account.user_id,
                    name: account.name,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Error with auth token generation: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn signup(
    State(identity): State<GuardedIdentityProvider>,
    Json(account): Json<NewAccount>,
) -> Response {
    match identity.create_account(account).await {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(IdentityError::InvalidInput(message)) => json_error(StatusCode::BAD_REQUEST, message),
        Err(err @ IdentityError::AccountExists) => {
            json_error(StatusCode::CONFLICT, err.to_string())
        }
        Err(err) => {
            error!("Sign-up failed with backend error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn logout(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    match user_manager.delete_auth_token(session.user_id, &AuthTokenValue(session.token)) {
        Ok(()) => (
            StatusCode::OK,
            [(header::SET_COOKIE, expired_session_cookie().to_string())],
        )
            .into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn classify(State(recommender): State<Recommender>, Json(body): Json<TextBody>) -> Response {
    Json(recommender.classifier().classify_detailed(&body.text).await).into_response()
}

async fn recommend(
    session: Option<Session>,
    State(recommender): State<Recommender>,
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<TextBody>,
) -> Response {
    if body.text.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, EMPTY_ANALYSIS_TEXT);
    }
    let outcome = recommender
        .recommend_and_log(
            session.map(|s| s.user_id),
            &body.text,
            user_manager.as_ref(),
        )
        .await;
    Json(RecommendResponse {
        recommendation: &outcome.recommendation,
        log_status: &outcome.log_status,
    })
    .into_response()
}

async fn get_history(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    match user_manager.get_history(session.user_id) {
        Ok(history) => Json(history).into_response(),
        Err(err) => {
            error!("Failed to load history of user {}: {}", session.user_id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// HTML pages

async fn home_page(session: Option<Session>, State(state): State<ServerState>) -> Response {
    let view = home_view(&state, session.as_ref());
    html_page(StatusCode::OK, state.pages.render_home(&view))
}

/// Login or sign-up form, or home when already logged in.
fn form_page(requested: Page, session: Option<Session>, pages: &Pages) -> Response {
    match Page::resolve(requested, session.is_some()) {
        Page::AuthenticatedHome => Redirect::to(Page::AuthenticatedHome.path()).into_response(),
        page => html_page(StatusCode::OK, pages.render_form(page, &FormView::default())),
    }
}

async fn login_page(session: Option<Session>, State(pages): State<GuardedPages>) -> Response {
    form_page(Page::Login, session, &pages)
}

async fn signup_page(session: Option<Session>, State(pages): State<GuardedPages>) -> Response {
    form_page(Page::Signup, session, &pages)
}

async fn login_submit(State(state): State<ServerState>, Form(form): Form<LoginBody>) -> Response {
    let failed = |status: StatusCode, message: &str| {
        let view = FormView {
            email: form.email.clone(),
            error: Some(message.to_string()),
            ..Default::default()
        };
        html_page(status, state.pages.render_form(Page::Login, &view))
    };

    let account = match state
        .identity
        .verify_credentials(&form.email, &form.password)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => return failed(StatusCode::UNAUTHORIZED, LOGIN_FAILED),
        Err(err) => {
            error!("Login failed with backend error: {}", err);
            return failed(StatusCode::INTERNAL_SERVER_ERROR, LOGIN_FAILED);
        }
    };

    let token = match state.user_manager.generate_auth_token(account.user_id) {
        Ok(token) => token,
        Err(err) => {
            error!("Error with auth token generation: {}", err);
            return failed(StatusCode::INTERNAL_SERVER_ERROR, LOGIN_FAILED);
        }
    };
    let target = Page::Login
        .transition(NavAction::LoginSucceeded)
        .map(|page| page.path())
        .unwrap_or("/");
    (
        [(header::SET_COOKIE, session_cookie(&token.value.0).to_string())],
        Redirect::to(target),
    )
        .into_response()
}

async fn signup_submit(
    State(state): State<ServerState>,
    Form(form): Form<SignupForm>,
) -> Response {
    let mut view = FormView {
        name: form.name.clone(),
        email: form.email.clone(),
        age: form.age.clone(),
        ..Default::default()
    };
    let (page, status) = match state.identity.create_account(form.into_account()).await {
        Ok(account) => {
            info!("Signed up user {}", account.user_id);
            view = FormView {
                email: account.email,
                notice: Some(SIGNUP_SUCCEEDED.to_string()),
                ..Default::default()
            };
            let page = Page::Signup
                .transition(NavAction::SignupSucceeded)
                .unwrap_or(Page::Login);
            (page, StatusCode::CREATED)
        }
        Err(IdentityError::InvalidInput(message)) => {
            view.error = Some(message);
            (Page::Signup, StatusCode::BAD_REQUEST)
        }
        Err(IdentityError::AccountExists) => {
            view.error = Some(SIGNUP_EXISTS.to_string());
            (Page::Signup, StatusCode::CONFLICT)
        }
        Err(err) => {
            error!("Sign-up failed with backend error: {}", err);
            view.error = Some(SIGNUP_EXISTS.to_string());
            (Page::Signup, StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    html_page(status, state.pages.render_form(page, &view))
}

async fn logout_submit(
    State(user_manager): State<GuardedUserManager>,
    session: Option<Session>,
) -> Response {
    if let Some(session) = session {
        if let Err(err) =
            user_manager.delete_auth_token(session.user_id, &AuthTokenValue(session.token))
        {
            error!("Failed to delete auth token of user {}: {}", session.user_id, err);
        }
    }
    let target = Page::AuthenticatedHome
        .transition(NavAction::Logout)
        .map(|page| page.path())
        .unwrap_or("/");
    (
        [(header::SET_COOKIE, expired_session_cookie().to_string())],
        Redirect::to(target),
    )
        .into_response()
}

async fn analyze_submit(
    session: Option<Session>,
    State(state): State<ServerState>,
    Form(body): Form<TextBody>,
) -> Response {
    if body.text.trim().is_empty() {
        let view = HomeView {
            error: Some(EMPTY_ANALYSIS_TEXT.to_string()),
            ..home_view(&state, session.as_ref())
        };
        return html_page(StatusCode::BAD_REQUEST, state.pages.render_home(&view));
    }

    let outcome = state
        .recommender
        .recommend_and_log(
            session.as_ref().map(|s| s.user_id),
            &body.text,
            state.user_manager.as_ref(),
        )
        .await;
    // History is read after logging so the new entry shows up.
    let view = HomeView {
        text: body.text,
        analysis: Some(AnalysisView::from(&outcome)),
        ..home_view(&state, session.as_ref())
    };
    html_page(StatusCode::OK, state.pages.render_home(&view))
}

pub fn make_app(config: ServerConfig, services: Services) -> Result<Router> {
    let state = ServerState::new(config.clone(), services, Pages::new()?);

    let auth_routes: Router = Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", get(logout))
        .with_state(state.clone());

    let mood_routes: Router = Router::new()
        .route("/classify", post(classify))
        .route("/recommend", post(recommend))
        .with_state(state.clone());

    let user_routes: Router = Router::new()
        .route("/history", get(get_history))
        .with_state(state.clone());

    let page_routes: Router = Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page).post(login_submit))
        .route("/signup", get(signup_page).post(signup_submit))
        .route("/logout", post(logout_submit))
        .route("/analyze", post(analyze_submit))
        .route("/v1/", get(get_stats))
        .with_state(state.clone());

    let mut app: Router = page_routes
        .nest("/v1/auth", auth_routes)
        .nest("/v1/mood", mood_routes)
        .nest("/v1/user", user_routes);

    if let Some(static_dir) = &config.static_dir {
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(config: ServerConfig, services: Services) -> Result<()> {
    let port = config.port;
    let app = make_app(config, services)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, CliConfig};
    use axum::{body::Body, http::Request};
    use tempfile::TempDir;
    use tower::ServiceExt; // for `oneshot`

    fn create_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let services = Services::build(&AppConfig::resolve(&cli, None).unwrap()).unwrap();
        let app = make_app(ServerConfig::default(), services).unwrap();
        (app, temp_dir)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn formats_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(59)), "0d 00:00:59");
        assert_eq!(
            format_uptime(Duration::from_secs(2 * 86_400 + 3 * 3600 + 4 * 60 + 5)),
            "2d 03:04:05"
        );
    }

    #[test]
    fn malformed_age_fails_validation() {
        let form = SignupForm {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            age: "twenty".to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        };
        assert!(matches!(
            form.into_account().validate(),
            Err(IdentityError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn responds_forbidden_on_protected_routes() {
        let (app, _dir) = create_app();

        for route in ["/v1/user/history", "/v1/auth/logout"] {
            let request = Request::builder().uri(route).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "route {}", route);
        }
    }

    #[tokio::test]
    async fn unknown_token_is_forbidden() {
        let (app, _dir) = create_app();
        let request = Request::builder()
            .uri("/v1/user/history")
            .header("Authorization", "not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn serves_anonymous_home() {
        let (app, _dir) = create_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response)
            .await
            .contains("Try the tool instantly below"));
    }

    #[tokio::test]
    async fn classifies_without_session() {
        let (app, _dir) = create_app();
        let request = Request::builder()
            .method("POST")
            .uri("/v1/mood/classify")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "This is so unexpected"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["mood"], "surprise");
        assert_eq!(body["decided_by"]["kind"], "keyword");
    }

    #[tokio::test]
    async fn blank_analysis_is_rejected() {
        let (app, _dir) = create_app();
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("text=+++"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains(EMPTY_ANALYSIS_TEXT));
    }
}
