//! Server-rendered HTML pages.

use crate::catalog::Song;
use crate::navigation::Page;
use crate::recommendation::{LogStatus, RecommendationOutcome};
use crate::user::HistoryEntry;
use anyhow::{Context as _, Result};
use serde::Serialize;
use tera::{Context, Tera};

pub const ANONYMOUS_INTRO: &str = "Try the tool instantly below, or log in to save your history!";
pub const EMPTY_HISTORY: &str =
    "You haven't requested any songs yet! Start the conversation below.";
pub const MOOD_PROMPT: &str = "Tell me about your mood, situation, or what's on your mind.";
pub const EMPTY_ANALYSIS_TEXT: &str = "Please enter some text for mood analysis.";
pub const LOGGED_MESSAGE: &str = "Interaction logged successfully and saved to history.";
pub const LOGIN_INVITE: &str = "Log in to save this recommendation to your history!";
pub const LOGIN_FAILED: &str = "Login failed. Check credentials.";
pub const SIGNUP_SUCCEEDED: &str = "Account created successfully! Please log in on the next page.";
pub const SIGNUP_EXISTS: &str = "Account creation failed. User with this email might already exist.";

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Moodwave</title>
</head>
<body>
  <header>
    <h1>🎶 Emotion-Based Song Recommender</h1>
    <nav>
      {% if user_name %}
      <form method="post" action="/logout"><button type="submit">Log out</button></form>
      {% else %}
      <a href="/">Home</a> | <a href="/login">Log in</a> | <a href="/signup">Sign up</a>
      {% endif %}
    </nav>
  </header>
  <main>
    {% if error %}<p class="error">{{ error }}</p>{% endif %}
    {% if notice %}<p class="notice">{{ notice }}</p>{% endif %}
    {% block content %}{% endblock content %}
  </main>
</body>
</html>
"#;

const HOME_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
{% if user_name %}
<h2>Welcome back, {{ user_name }}!</h2>
<section class="history">
  <h3>Your last recommendations</h3>
  {% if history | length == 0 %}
  <p>{{ empty_history }}</p>
  {% else %}
  <table>
    <tr><th>Time</th><th>Input</th><th>Mood</th><th>Song</th><th>Artist</th><th>Link</th></tr>
    {% for entry in history %}
    <tr>
      <td>{{ entry.time }}</td>
      <td>{{ entry.input_snippet }}</td>
      <td>{{ entry.mood | upper }}</td>
      <td>{{ entry.song_title }}</td>
      <td>{{ entry.artists }}</td>
      <td><a href="{{ entry.link }}">Listen</a></td>
    </tr>
    {% endfor %}
  </table>
  {% endif %}
</section>
{% else %}
<p>{{ anonymous_intro }}</p>
{% endif %}
<form method="post" action="/analyze">
  <label for="text">{{ mood_prompt }}</label>
  <textarea id="text" name="text">{{ text }}</textarea>
  <button type="submit">Analyze Mood &amp; Get Song</button>
</form>
{% if analysis %}
<section class="analysis">
  <p>The detected emotional tone is: <strong>{{ analysis.mood | upper }}</strong>.</p>
  {% for warning in analysis.warnings %}<p class="warning">{{ warning }}</p>{% endfor %}
  {% if analysis.song %}
  <div class="song">
    <h3>{{ analysis.song.title }}</h3>
    <p>{{ analysis.song.artists }}</p>
    <a href="{{ analysis.song.link }}">Listen Now</a>
  </div>
  {% else %}
  <p class="warning">No songs found for mood: {{ analysis.mood | upper }}. Please add more songs to your database.</p>
  {% endif %}
  {% if analysis.log_message %}<p class="notice">{{ analysis.log_message }}</p>{% endif %}
  {% if analysis.log_error %}<p class="error">{{ analysis.log_error }}</p>{% endif %}
</section>
{% endif %}
{% endblock content %}
"#;

const LOGIN_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h2>Log in</h2>
<form method="post" action="/login">
  <label>Email <input type="email" name="email" value="{{ email }}"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Log in</button>
</form>
<p><a href="/signup">Create an account</a> | <a href="/">Back home</a></p>
{% endblock content %}
"#;

const SIGNUP_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h2>Sign up</h2>
<form method="post" action="/signup">
  <label>Name <input type="text" name="name" value="{{ name }}"></label>
  <label>Email <input type="email" name="email" value="{{ email }}"></label>
  <label>Age <input type="number" name="age" min="10" max="120" value="{{ age }}"></label>
  <label>Password <input type="password" name="password"></label>
  <label>Retype password <input type="password" name="confirm_password"></label>
  <button type="submit">Create account</button>
</form>
<p><a href="/login">Already registered? Log in</a> | <a href="/">Back home</a></p>
{% endblock content %}
"#;

#[derive(Debug, Default, Serialize)]
pub struct AnalysisView {
    pub mood: String,
    pub song: Option<Song>,
    pub warnings: Vec<String>,
    pub log_message: Option<String>,
    pub log_error: Option<String>,
}

impl From<&RecommendationOutcome> for AnalysisView {
    fn from(outcome: &RecommendationOutcome) -> Self {
        let (log_message, log_error) = match &outcome.log_status {
            LogStatus::Logged => (Some(LOGGED_MESSAGE.to_string()), None),
            LogStatus::NotLoggedIn => (Some(LOGIN_INVITE.to_string()), None),
            LogStatus::Failed(reason) => (
                None,
                Some(format!("Could not save this interaction: {}", reason)),
            ),
            LogStatus::NoSong => (None, None),
        };
        AnalysisView {
            mood: outcome.recommendation.mood.to_string(),
            song: outcome.recommendation.song.clone(),
            warnings: outcome.recommendation.warnings.clone(),
            log_message,
            log_error,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct HomeView {
    pub user_name: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub text: String,
    pub analysis: Option<AnalysisView>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct FormView {
    pub user_name: Option<String>,
    pub name: String,
    pub email: String,
    pub age: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("home.html", HOME_TEMPLATE),
            ("login.html", LOGIN_TEMPLATE),
            ("signup.html", SIGNUP_TEMPLATE),
        ])
        .context("Failed to compile page templates")?;
        Ok(Self { tera })
    }

    pub fn render_home(&self, view: &HomeView) -> Result<String> {
        let mut context = Context::from_serialize(view)?;
        context.insert("anonymous_intro", ANONYMOUS_INTRO);
        context.insert("empty_history", EMPTY_HISTORY);
        context.insert("mood_prompt", MOOD_PROMPT);
        Ok(self.tera.render("home.html", &context)?)
    }

    /// Login or sign-up form, depending on `page`.
    pub fn render_form(&self, page: Page, view: &FormView) -> Result<String> {
        let template = match page {
            Page::Login => "login.html",
            Page::Signup => "signup.html",
            other => anyhow::bail!("No form for page {:?}", other),
        };
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(template, &context)?)
    }
}
