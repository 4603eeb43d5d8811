//! M-Pesa CLI
//!
//! A command-line client for the M-Pesa Daraja API.
//!
//! # Architecture Overview
//!
//! ```text
//!   mpesa-cli <command>
//!        │
//!        ▼
//!   ┌──────────┐    ┌─────────────┐    ┌──────────┐    ┌──────────────┐
//!   │  config  │───▶│ credentials │───▶│   auth   │───▶│ transactions │───▶ stdout
//!   │ resolve  │    │  keychain   │    │  token   │    │ status query │
//!   └──────────┘    └─────────────┘    └──────────┘    └──────────────┘
//!                          session (state machine, no retries)
//!
//!   lifecycle::progress runs beside the network call and is always
//!   stopped before anything is printed.
//! ```

use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mpesa_cli::config::{self, Config, ConfigSources};
use mpesa_cli::credentials::{CredentialStore, Credentials};
use mpesa_cli::health::{default_targets, run_doctor};
use mpesa_cli::lifecycle::with_progress;
use mpesa_cli::observability::init_logging;
use mpesa_cli::resilience::DEFAULT_TIMEOUT;
use mpesa_cli::{Session, SessionError, TokenService};

#[derive(Parser)]
#[command(name = "mpesa-cli", version)]
#[command(about = "A command-line interface for M-Pesa API operations", long_about = None)]
struct Cli {
    /// Config file (default: mpesa-cli.yaml in ., ~/.config/mpesa-cli, /etc/mpesa-cli)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with the M-Pesa API and store credentials in the keychain
    Login {
        /// Consumer key (prompted when omitted)
        #[arg(long)]
        consumer_key: Option<String>,
    },
    /// Run environment and credential health checks
    Doctor,
    /// Manage M-Pesa transactions
    Transactions {
        #[command(subcommand)]
        command: TransactionCommands,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// Query the status of an M-Pesa transaction
    Query {
        /// The ID of the transaction to query
        #[arg(short, long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a sample config file
    Init {
        #[arg(default_value = "mpesa-cli.yaml")]
        path: PathBuf,
    },
    /// Print the resolved configuration with secrets masked
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(err.as_ref());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config_path = cli.config.as_deref();
    let sources = ConfigSources::from_process();

    match cli.command {
        Commands::Login { consumer_key } => {
            let config = config::resolve(config_path, &sources)?;
            login(config, consumer_key).await?;
        }
        Commands::Doctor => {
            let resolved = config::resolve(config_path, &sources);
            let timeout = resolved.as_ref().map(Config::timeout).unwrap_or(DEFAULT_TIMEOUT);
            let tokens = TokenService::new(timeout)?;
            let store = CredentialStore::keychain();
            let targets = default_targets(resolved.as_ref().ok());

            println!("🔎 Running M-Pesa CLI Environment Health Check...");
            let report = with_progress(
                "Checking...",
                run_doctor(&resolved, &store, &tokens, &targets),
            )
            .await;
            print!("{}", report);
            println!("\nHealth check complete.");

            if !report.is_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Transactions {
            command: TransactionCommands::Query { id },
        } => {
            let config = config::resolve(config_path, &sources)?;
            let mut session = Session::new(config, CredentialStore::keychain())?;

            let status = with_progress(
                format!("Querying status for transaction ID: {}", id),
                session.query(&id),
            )
            .await?;

            println!("✔ Query successful!");
            println!("--------------------");
            println!("Response Code: {}", status.response_code);
            println!("Description: {}", status.response_description);
            println!("Conversation ID: {}", status.conversation_id);
            println!("Originator Conversation ID: {}", status.originator_conversation_id);
            println!("--------------------");
        }
        Commands::Config {
            command: ConfigCommands::Init { path },
        } => {
            config::write_template(&path)?;
            println!("✅ Wrote sample configuration to {}", path.display());
        }
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            let config = config::resolve(config_path, &sources)?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn login(config: Config, consumer_key: Option<String>) -> Result<(), Box<dyn Error>> {
    println!("First, please enter your credentials from the Daraja Portal.");

    let consumer_key = match consumer_key {
        Some(key) => key.trim().to_string(),
        None => prompt("? Consumer Key: ")?,
    };
    let env_secret = std::env::var("MPESA_CONSUMER_SECRET").ok();
    let consumer_secret = match secret_source(env_secret, io::stdin().is_terminal()) {
        SecretSource::Env(secret) => secret,
        SecretSource::Hidden => rpassword::prompt_password("? Consumer Secret: ")?
            .trim()
            .to_string(),
        SecretSource::Plain => prompt("? Consumer Secret: ")?,
    };

    if consumer_key.is_empty() || consumer_secret.is_empty() {
        return Err("consumer key and secret must not be empty".into());
    }

    let credentials = Credentials::new(consumer_key, consumer_secret);
    let session = Session::new(config, CredentialStore::keychain())?;

    with_progress("Authenticating with M-Pesa...", session.login(&credentials)).await?;

    println!("✔ Authentication successful!");
    println!("✅ Your credentials have been securely stored.");
    println!("💡 Tip: Run `mpesa-cli doctor` to check your connection.");
    Ok(())
}

/// Where the consumer secret is read from.
#[derive(Debug, PartialEq, Eq)]
enum SecretSource {
    Env(String),
    /// Terminal prompt with echo off.
    Hidden,
    /// Piped stdin.
    Plain,
}

fn secret_source(env_secret: Option<String>, stdin_is_terminal: bool) -> SecretSource {
    match env_secret.map(|s| s.trim().to_string()) {
        Some(secret) if !secret.is_empty() => SecretSource::Env(secret),
        _ if stdin_is_terminal => SecretSource::Hidden,
        _ => SecretSource::Plain,
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn report_error(err: &(dyn Error + 'static)) {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    eprintln!("❌ Error: {}", message);

    let missing_credentials = err
        .downcast_ref::<SessionError>()
        .is_some_and(SessionError::is_credentials_missing);
    if missing_credentials {
        eprintln!("💡 Run `mpesa-cli login` to store your credentials.");
    }
}
