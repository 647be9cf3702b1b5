use anyhow::Result;
use clap::Parser;
use moodwave_server::chat::{
    AuthChoice, ChatInput, ChatReply, ChatSession, AUTH_PROMPT, EMPTY_INPUT_REPLY, EXIT_HINT,
    INVALID_AUTH_OPTION, NO_SONG_REPLY,
};
use moodwave_server::cli_style::{
    get_auth_prompt, get_prompt, print_banner, print_bot, print_detected_mood, print_error,
    print_goodbye, print_history, print_separator, print_song_panel, print_success, print_warning,
};
use moodwave_server::identity::NewAccount;
use moodwave_server::navigation::{NavAction, Page};
use moodwave_server::recommendation::{LogStatus, RecommendationOutcome};
use moodwave_server::{CliArgs, Services};
use rustyline::{
    completion::Completer, error::ReadlineError, highlight::Highlighter, history::FileHistory,
    validate::Validator, CompletionType, Config, Editor, Helper,
};
use tokio::runtime::Runtime;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const COMMAND_WORDS: [&str; 6] = ["login", "signup", "history", "logout", "exit", "quit"];

#[derive(Clone, Copy, PartialEq, Debug)]
enum Answer {
    Plain,
    /// Never written to the line history.
    Secret,
}

const LOGIN_PROMPTS: [(&str, Answer); 2] = [
    ("Enter your email: ", Answer::Plain),
    ("Enter your password: ", Answer::Secret),
];

const SIGNUP_PROMPTS: [(&str, Answer); 5] = [
    ("Enter your name: ", Answer::Plain),
    ("Enter your email: ", Answer::Plain),
    ("Enter your age: ", Answer::Plain),
    ("Enter your password: ", Answer::Secret),
    ("Retype your password: ", Answer::Secret),
];

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        MyHelper {
            commands_names: COMMAND_WORDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.is_empty() || line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn remember(rl: &mut Editor<MyHelper, FileHistory>, line: &str, answer: Answer) {
    if answer == Answer::Plain {
        let _ = rl.add_history_entry(line);
    }
}

struct ChatApp {
    services: Services,
    runtime: Runtime,
    rl: Editor<MyHelper, FileHistory>,
    session: Option<ChatSession>,
}

impl ChatApp {
    /// None when the user closed the input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.read_answer(prompt, Answer::Plain)
    }

    fn read_answer(&mut self, prompt: &str, answer: Answer) -> Result<Option<String>> {
        match self.rl.readline(prompt) {
            Ok(line) => {
                remember(&mut self.rl, &line, answer);
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn run(&mut self) -> Result<()> {
        let mut page = Page::AnonymousHome;
        loop {
            let next = match page {
                Page::AnonymousHome => self.anonymous_home(page)?,
                Page::Login => self.login(page)?,
                Page::Signup => self.signup(page)?,
                Page::AuthenticatedHome => self.chat(page)?,
            };
            match next {
                Some(next) => {
                    debug!("Moving from {:?} to {:?}", page, next);
                    page = next;
                }
                None => break,
            }
        }
        print_goodbye();
        Ok(())
    }

    fn anonymous_home(&mut self, page: Page) -> Result<Option<Page>> {
        println!("Please log in or sign up to continue.");
        let Some(line) = self.read_line(&get_auth_prompt(AUTH_PROMPT))? else {
            return Ok(None);
        };
        let next = match AuthChoice::parse(&line) {
            AuthChoice::Login => page.transition(NavAction::OpenLogin)?,
            AuthChoice::Signup => page.transition(NavAction::OpenSignup)?,
            AuthChoice::Exit => return Ok(None),
            AuthChoice::Invalid => {
                print_warning(INVALID_AUTH_OPTION);
                page
            }
        };
        Ok(Some(next))
    }

    fn login(&mut self, page: Page) -> Result<Option<Page>> {
        let [(email_prompt, email_answer), (password_prompt, password_answer)] = LOGIN_PROMPTS;
        let Some(email) = self.read_answer(email_prompt, email_answer)? else {
            return Ok(None);
        };
        let Some(password) = self.read_answer(password_prompt, password_answer)? else {
            return Ok(None);
        };

        let identity = self.services.identity.clone();
        let verified = self
            .runtime
            .block_on(identity.verify_credentials(email.trim(), &password));

        match verified {
            Ok(Some(account)) => {
                print_success("Login successful!");
                println!("Welcome, {}! Feel free to tell me how you're feeling.", account.name);
                println!("{}", EXIT_HINT);
                self.session = Some(ChatSession::new(
                    self.services.recommender.clone(),
                    self.services.user_manager.clone(),
                    account.user_id,
                ));
                Ok(Some(page.transition(NavAction::LoginSucceeded)?))
            }
            Ok(None) => {
                print_error("Login failed. User not found. Please try again.");
                Ok(Some(page.transition(NavAction::BackHome)?))
            }
            Err(err) => {
                print_error(&format!("Login failed: {}", err));
                Ok(Some(page.transition(NavAction::BackHome)?))
            }
        }
    }

    fn signup(&mut self, page: Page) -> Result<Option<Page>> {
        let mut answers = Vec::with_capacity(SIGNUP_PROMPTS.len());
        for (prompt, answer) in SIGNUP_PROMPTS {
            match self.read_answer(prompt, answer)? {
                Some(answer) => answers.push(answer),
                None => return Ok(None),
            }
        }
        let [name, email, age, password, confirm_password]: [String; 5] = match answers.try_into()
        {
            Ok(answers) => answers,
            Err(_) => return Ok(None),
        };

        let Ok(age) = age.trim().parse::<u32>() else {
            print_error("Sign-up failed. Age must be a number.");
            return Ok(Some(page.transition(NavAction::BackHome)?));
        };
        let account = NewAccount {
            name,
            email,
            age,
            password,
            confirm_password,
        };

        let identity = self.services.identity.clone();
        match self.runtime.block_on(identity.create_account(account)) {
            Ok(_) => {
                print_success("Sign-up successful! You can now log in.");
                Ok(Some(page.transition(NavAction::SignupSucceeded)?))
            }
            Err(err) => {
                print_error(&format!("Sign-up failed. {}", err));
                Ok(Some(page.transition(NavAction::BackHome)?))
            }
        }
    }

    fn chat(&mut self, page: Page) -> Result<Option<Page>> {
        if self.session.is_none() {
            return Ok(Some(Page::resolve(page, false)));
        }
        loop {
            let Some(line) = self.read_line(&get_prompt())? else {
                return Ok(None);
            };
            if let ChatInput::Text(_) = ChatInput::parse(&line) {
                println!("Analyzing your mood...");
            }

            let Some(session) = self.session.as_ref() else {
                return Ok(Some(Page::resolve(page, false)));
            };
            let reply = self.runtime.block_on(session.handle(&line));

            match reply {
                ChatReply::Goodbye => return Ok(None),
                ChatReply::AskAgain => print_bot(EMPTY_INPUT_REPLY),
                ChatReply::LoggedOut => {
                    self.session = None;
                    print_bot("You are now logged out.");
                    return Ok(Some(page.transition(NavAction::Logout)?));
                }
                ChatReply::History(history) => print_history(&history),
                ChatReply::Recommendation(outcome) => print_outcome(&outcome),
                ChatReply::Error(message) => {
                    print_error(&format!("An error occurred: {}", message))
                }
            }
        }
    }
}

fn print_outcome(outcome: &RecommendationOutcome) {
    let recommendation = &outcome.recommendation;
    print_detected_mood(recommendation.mood);
    for warning in &recommendation.warnings {
        print_warning(warning);
    }
    match &recommendation.song {
        Some(song) => print_song_panel(song),
        None => print_bot(NO_SONG_REPLY),
    }
    if let LogStatus::Failed(reason) = &outcome.log_status {
        print_warning(&format!("Could not save this interaction: {}", reason));
    }
    print_separator();
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let config = cli_args.resolve()?;
    let services = Services::build(&config)?;
    let runtime = Runtime::new()?;

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));

    print_banner();

    let mut app = ChatApp {
        services,
        runtime,
        rl,
        session: None,
    };
    app.run()
}
