mod commands;
mod output;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocketledger_lib::{FinanceClient, SessionStore, Settings};

use crate::commands::{Context, Reported};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pocketledger")]
#[command(about = "Manage accounts, categories, budgets and transfers from the terminal")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API base URL (overrides POCKETLEDGER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(commands::auth::LoginArgs),
    /// Drop the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List, edit or export accounts
    #[command(subcommand)]
    Accounts(commands::accounts::AccountsCommand),
    /// List, edit or export categories
    #[command(subcommand)]
    Categories(commands::categories::CategoriesCommand),
    /// List, edit or export monthly budgets
    #[command(subcommand)]
    Budgets(commands::budgets::BudgetsCommand),
    /// List, edit or export transfers between accounts
    #[command(subcommand)]
    Transfers(commands::transfers::TransfersCommand),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let directive = "pocketledger=info"
        .parse()
        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // Failures already shown through the notifier only set the exit code.
        if err.downcast_ref::<Reported>().is_none() {
            eprintln!("Error: {:#}", err);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = OutputFormat::parse(&cli.output)?;

    let mut settings = Settings::from_env();
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }
    tracing::debug!("Using API at {}", settings.api_url);

    let session = Arc::new(SessionStore::from_file(&settings.session_file)?);
    let client = FinanceClient::new(&settings.api_url, session, settings.retry);
    let ctx = Context::new(client, settings.locale, format);

    match &cli.command {
        Commands::Login(args) => commands::auth::login(args, &ctx).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx)?,
        Commands::Accounts(cmd) => commands::accounts::run(cmd, &ctx).await?,
        Commands::Categories(cmd) => commands::categories::run(cmd, &ctx).await?,
        Commands::Budgets(cmd) => commands::budgets::run(cmd, &ctx).await?,
        Commands::Transfers(cmd) => commands::transfers::run(cmd, &ctx).await?,
    }

    Ok(())
}
