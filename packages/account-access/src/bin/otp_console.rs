//! Console driver for the login/registration flow
//!
//! Runs one flow against the configured Twilio Verify service and document
//! store, reading phone numbers and codes from stdin. Meant for checking a
//! deployment's service contract by hand.

use std::sync::Arc;

use account_access_core::config::Config;
use account_access_core::domains::auth::{FlowMode, FlowSnapshot, FlowState, SessionFlow};
use account_access_core::kernel::{AuthDeps, MemoryDocumentStore};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Login,
    Register,
}

#[derive(Parser)]
#[command(name = "otp_console")]
#[command(about = "Drive a phone login or registration flow from the terminal")]
struct Cli {
    #[arg(value_enum)]
    mode: Mode,

    /// Name for the account record (register only)
    #[arg(long, default_value = "")]
    name: String,

    /// E-mail for the account record (register only)
    #[arg(long, default_value = "")]
    email: String,

    /// Keep account records in memory instead of Firestore
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,account_access_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let mut deps = AuthDeps::from_config(&config);
    if cli.memory_store {
        deps.document_store = Arc::new(MemoryDocumentStore::new());
    }

    let mode = match cli.mode {
        Mode::Login => FlowMode::Login,
        Mode::Register => FlowMode::Registration,
    };
    let flow = SessionFlow::new(mode, deps);
    flow.set_name(cli.name);
    flow.set_email(cli.email);

    println!("Phone number (or :quit):");
    let mut last_phone = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = line.trim().to_string();
        if input == ":quit" {
            break;
        }
        if input == ":back" {
            flow.leave();
            render(&flow.snapshot());
            continue;
        }

        let result = match flow.state() {
            // Resending is just submitting the same number again
            FlowState::AwaitingCode if input == ":resend" => flow.submit_phone(&last_phone).await,
            FlowState::AwaitingCode => {
                flow.code_changed();
                flow.submit_code(&input).await
            }
            _ => {
                flow.phone_changed();
                last_phone = input;
                flow.submit_phone(&last_phone).await
            }
        };
        if let Err(e) = &result {
            tracing::debug!(error = %e, "submission failed");
        }

        render(&flow.snapshot());
        if flow.state() == FlowState::Authenticated {
            println!("Signed in.");
            break;
        }
    }

    Ok(())
}

fn render(snapshot: &FlowSnapshot) {
    if let Some(message) = &snapshot.error_message {
        println!("! {}", message);
    }
    match snapshot.state {
        FlowState::AwaitingPhone => println!("Phone number:"),
        FlowState::AwaitingCode => println!("Code (:resend for a new one, :back to change number):"),
        FlowState::Authenticated => {}
        other => println!("[{:?}]", other),
    }
}
