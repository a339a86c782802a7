//! Pennywise CLI - Personal finance tracker
//!
//! Usage:
//!   pennywise init                          Initialize database
//!   pennywise users add -n NAME -e EMAIL    Create a user
//!   pennywise analytics --user 1            Show analytics for a user
//!   pennywise serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use pennywise_core::{AppConfig, Clock, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let today = SystemClock.today();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                cli.no_encrypt,
                &config,
                host.as_deref(),
                port,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UsersAction::List => commands::cmd_users_list(&db),
                UsersAction::Add {
                    name,
                    email,
                    password,
                    admin,
                } => commands::cmd_users_add(&db, &name, &email, &password, admin).map(|_| ()),
                UsersAction::Promote { email } => commands::cmd_users_promote(&db, &email),
            }
        }
        Commands::Incomes { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                IncomesAction::Add {
                    user,
                    source,
                    amount,
                    category,
                    date,
                } => commands::cmd_incomes_add(
                    &db,
                    user,
                    &source,
                    amount,
                    &category,
                    date.as_deref(),
                    today,
                )
                .map(|_| ()),
                IncomesAction::List { user } => commands::cmd_incomes_list(&db, user),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                ExpensesAction::Add {
                    user,
                    description,
                    amount,
                    category,
                    date,
                    payment_method,
                } => commands::cmd_expenses_add(
                    &db,
                    user,
                    &description,
                    amount,
                    &category,
                    date.as_deref(),
                    payment_method.as_deref(),
                    today,
                )
                .map(|_| ()),
                ExpensesAction::List { user } => commands::cmd_expenses_list(&db, user),
            }
        }
        Commands::Analytics { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_analytics(&db, &SystemClock, config.analytics, user, json)
        }
        Commands::Export {
            user,
            file,
            from,
            to,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, user, &file, from.as_deref(), to.as_deref())
        }
    }
}
