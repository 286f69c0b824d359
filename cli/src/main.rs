//! `pitwall`: command-line client for the Pitwall stats API.
//!
//! Drives the same session core as the browser client, with a `reqwest`
//! transport and a credential file in place of `sessionStorage`. Each
//! invocation builds one session, runs one command, and exits; the credential
//! file carries tokens (and, in cookie mode, the cookie jar) between runs.

mod file_store;
mod transport;


use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use session::config::{DEFAULT_API_BASE, DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER};
use session::{ApiClient, AuthError, AuthSession, SessionConfig, SessionMode, Storage, Transport, token};
use tracing_subscriber::EnvFilter;

use crate::file_store::{FileStorage, default_store_path};
use crate::transport::ReqwestTransport;

/// Credential-file key holding the cookie jar between invocations.
const COOKIE_KEY: &str = "session_cookies";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),
    #[error("credential store {path}: {message}")]
    Store { path: String, message: String },
    #[error("failed to read password from stdin: {0}")]
    Input(#[from] io::Error),
    #[error("not signed in; run `pitwall login` first")]
    NotSignedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pitwall", about = "Pitwall motorsport stats API CLI")]
struct Cli {
    #[arg(long, env = "PITWALL_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, env = "PITWALL_SESSION_MODE", default_value = "bearer", value_parser = SessionMode::parse)]
    mode: SessionMode,

    #[arg(long, env = "PITWALL_CSRF_COOKIE", default_value = DEFAULT_CSRF_COOKIE)]
    csrf_cookie: String,

    #[arg(long, env = "PITWALL_CSRF_HEADER", default_value = DEFAULT_CSRF_HEADER)]
    csrf_header: String,

    #[arg(long, env = "PITWALL_STORE", help = "Credential file [default: ~/.pitwall/session.json]")]
    store: Option<PathBuf>,

    #[arg(long, env = "PITWALL_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, env = "PITWALL_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    connect_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(&self.api_base, self.mode);
        config.csrf_cookie.clone_from(&self.csrf_cookie);
        config.csrf_header.clone_from(&self.csrf_header);
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the issued credentials.
    Login {
        #[arg(long, env = "PITWALL_USERNAME")]
        username: String,
        #[arg(long, env = "PITWALL_PASSWORD", hide_env_values = true, help = "Read from stdin when omitted")]
        password: Option<String>,
    },
    /// Create an account and sign in with it.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "PITWALL_PASSWORD", hide_env_values = true, help = "Read from stdin when omitted")]
        password: Option<String>,
        #[arg(long, help = "Defaults to --password")]
        password_confirm: Option<String>,
    },
    /// End the session on the backend and forget local credentials.
    Logout,
    /// Print the signed-in user.
    Whoami,
    /// Exchange the refresh credential for a new access token.
    Refresh,
    /// Print local session state without contacting the backend.
    Status,
    /// GET an API path (e.g. `/drivers/`) and print the JSON body.
    Get { path: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing();

    let store_path = cli.store.clone().unwrap_or_else(default_store_path);
    let store = Rc::new(FileStorage::open(store_path)?);
    let transport = Rc::new(ReqwestTransport::new(
        &cli.api_base,
        Duration::from_secs(cli.timeout_secs),
        Duration::from_secs(cli.connect_timeout_secs),
    )?);
    if let Some(saved) = store.read(COOKIE_KEY) {
        transport.restore_cookies(&saved);
    }

    let session = AuthSession::new(Rc::clone(&transport), cli.session_config(), Rc::clone(&store));
    tracing::debug!(mode = cli.mode.as_str(), api_base = %cli.api_base, store = %store.path().display(), "session ready");
    let result = run(&session, &store, cli.command).await;

    if cli.mode == SessionMode::Cookie {
        store.write(COOKIE_KEY, transport.cookie_header().as_deref());
    }
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PITWALL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn run<T: Transport + 'static>(
    session: &AuthSession<T>,
    store: &FileStorage,
    command: Command,
) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let password = resolve_password(password)?;
            session.login(&username, &password).await?;
            let user = session.ensure_current_user().await.ok_or(CliError::NotSignedIn)?;
            tracing::info!(username = %user.username, "signed in");
            println!("signed in as {}", user.username);
            Ok(())
        }
        Command::Register { username, password, password_confirm } => {
            let password = resolve_password(password)?;
            let confirm = password_confirm.unwrap_or_else(|| password.clone());
            session.register(&username, &password, &confirm).await?;
            println!("registered {username}");
            Ok(())
        }
        Command::Logout => {
            session.logout().await;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = session.ensure_current_user().await.ok_or(CliError::NotSignedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Refresh => {
            session.refresh_access_token().await?;
            print_json(&status_report(session, store))
        }
        Command::Status => print_json(&status_report(session, store)),
        Command::Get { path } => {
            let body: Value = ApiClient::new(session.clone()).get_json(&path).await?;
            print_json(&body)
        }
    }
}

/// Local session state. Never contacts the backend.
fn status_report<T: Transport + 'static>(session: &AuthSession<T>, store: &FileStorage) -> Value {
    json!({
        "mode": session.config().mode.as_str(),
        "api_base": session.config().api_base,
        "store": store.path().display().to_string(),
        "authenticated": session.is_authenticated(),
        "admin": session.is_admin(),
        "user": session.current_user(),
        "access_expires_at": session.access_token().as_deref().and_then(token::expiry),
        "refresh_expires_at": session.refresh_token().as_deref().and_then(token::expiry),
    })
}

fn resolve_password(password: Option<String>) -> Result<String, CliError> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("password: ");
    read_password(io::stdin().lock())
}

fn read_password(mut reader: impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
