//! Classeviva CLI - query the school register for several accounts at once.
//!
//! Every query command logs in the configured accounts concurrently and prints
//! one JSON document on stdout, keyed by account. Logging goes to stderr.

mod config;
mod credentials;

use std::io;

use anyhow::{bail, Context, Result};
use classeviva_core::{
    AccountClient, AccountCollection, ApiClient, Credential, Operation, OperationOutput,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use credentials::CredentialStore;

const USAGE: &str = "\
Usage: classeviva <command> [args]

Commands:
  status              Log in and report each account's session
  login               Log in every account, failing on the first bad password
  grades              Grades for every account
  absences            Absences, late entries and early exits
  agenda [FROM TO]    Agenda between two YYYY-MM-DD dates (default: school year)
  lessons [DAY]       Lessons on a YYYY-MM-DD day (default: today)
  subjects            Subjects and their teachers
  periods             School periods
  noticeboard         Noticeboard items
  set-password ID     Store the password for an account in the keychain
  add ID              Add an account to the configuration

Accounts come from the config file or CLASSEVIVA_ACCOUNTS (comma-separated).
Set RUST_LOG=info or RUST_LOG=debug for more output.";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=classeviva_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    match command {
        "help" | "-h" | "--help" => {
            println!("{}", USAGE);
            Ok(())
        }
        "add" => add_account(required(rest, "ID")?),
        "set-password" => set_password(required(rest, "ID")?),
        _ => run_query(command, rest).await,
    }
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    match args.first() {
        Some(value) => Ok(value.as_str()),
        None => bail!("Missing argument {}\n\n{}", name, USAGE),
    }
}

fn add_account(identifier: &str) -> Result<()> {
    let mut config = Config::load()?;
    if !config.add_account(identifier) {
        eprintln!("{} is already configured", identifier);
        return Ok(());
    }
    let password = CredentialStore::prompt(identifier)?;
    CredentialStore::store(identifier, &password)?;
    config.save()?;
    eprintln!("Added {} to {}", identifier, Config::config_path()?.display());
    Ok(())
}

fn set_password(identifier: &str) -> Result<()> {
    let password = CredentialStore::prompt(identifier)?;
    CredentialStore::store(identifier, &password)?;
    eprintln!("Password for {} saved", identifier);
    Ok(())
}

async fn run_query(command: &str, args: &[String]) -> Result<()> {
    let operation = match command {
        "status" | "login" | "grades" | "absences" => None,
        "agenda" => Some(Operation::Agenda {
            from: args.first().cloned(),
            to: args.get(1).cloned(),
        }),
        "lessons" => Some(Operation::Lessons {
            day: args.first().cloned(),
        }),
        "subjects" => Some(Operation::Subjects),
        "periods" => Some(Operation::Periods),
        "noticeboard" => Some(Operation::Noticeboard),
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    };

    let config = Config::load()?.with_env_overrides();
    let accounts = build_collection(&config)?;
    info!(command, accounts = accounts.len(), "Running");

    match command {
        "status" => {
            if let Err(e) = accounts.authenticate_all().await {
                warn!(error = %e, "Not every account logged in");
            }
            print_status(&accounts).await
        }
        "login" => {
            accounts.authenticate_all().await.context("Login failed")?;
            print_status(&accounts).await
        }
        "grades" => print_json(&accounts.grades_for_all().await),
        "absences" => print_json(&accounts.absences_for_all().await),
        _ => {
            let Some(operation) = operation else {
                bail!("Unknown command '{}'", command);
            };
            let results = accounts.apply_to_all(&operation).await;
            print_results(&accounts, results)
        }
    }
}

fn build_collection(config: &Config) -> Result<AccountCollection> {
    if config.accounts.is_empty() {
        bail!("No accounts configured. Run `classeviva add <ID>` or set CLASSEVIVA_ACCOUNTS");
    }

    let api = ApiClient::new(config.client_config()).context("Failed to build HTTP client")?;
    let mut clients = Vec::with_capacity(config.accounts.len());
    for identifier in &config.accounts {
        let password = CredentialStore::resolve(identifier)
            .with_context(|| format!("No password for {}", identifier))?;
        clients.push(AccountClient::new(
            Credential::new(identifier.as_str(), password),
            api.clone(),
        ));
    }

    let accounts = AccountCollection::new(clients);
    if accounts.len() < config.accounts.len() {
        warn!(
            configured = config.accounts.len(),
            distinct = accounts.len(),
            "Duplicate accounts ignored"
        );
    }
    Ok(accounts)
}

async fn print_status(accounts: &AccountCollection) -> Result<()> {
    let mut members = Vec::with_capacity(accounts.len());
    for client in accounts.iter() {
        let profile = client.profile().ok();
        members.push(json!({
            "identifier": client.identifier(),
            "name": profile.map(|p| p.full_name()),
            "authenticated": client.is_authenticated(),
            "accepted_by_server": client.status().await,
            "expires_in_secs": client.session_expires_in().num_seconds(),
        }));
    }
    let stats = accounts.statistics();
    print_json(&json!({
        "total": stats.total,
        "authenticated": stats.authenticated,
        "unauthenticated": stats.unauthenticated,
        "members": members,
    }))
}

/// One entry per account; failed accounts map to `null`.
fn print_results(
    accounts: &AccountCollection,
    results: Vec<Option<OperationOutput>>,
) -> Result<()> {
    let mut out = Map::new();
    let mut failures = 0;
    for (client, result) in accounts.iter().zip(results) {
        if result.is_none() {
            failures += 1;
        }
        out.insert(client.identifier().to_string(), serde_json::to_value(result)?);
    }
    print_json(&Value::Object(out))?;
    if failures > 0 && failures == accounts.len() {
        bail!("Every account failed");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
