//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pennywise - Track income, expenses, budgets, and where your money goes
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "pennywise.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set PENNYWISE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Config file (defaults to <config dir>/pennywise/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    ///
    /// Requires PENNYWISE_JWT_SECRET. PENNYWISE_ALLOWED_ORIGINS and
    /// PENNYWISE_TOKEN_TTL_DAYS are optional.
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Directory of static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Record and list incomes
    Incomes {
        #[command(subcommand)]
        action: IncomesAction,
    },

    /// Record and list expenses
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Show analytics for a user
    Analytics {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
    },

    /// Export a user's transactions to CSV
    Export {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Output file
        #[arg(short, long)]
        file: PathBuf,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List all users
    List,

    /// Create a user
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,

        /// Create as admin
        #[arg(long)]
        admin: bool,
    },

    /// Grant the admin role
    Promote {
        /// Email of the user to promote
        email: String,
    },
}

#[derive(Subcommand)]
pub enum IncomesAction {
    /// Record an income
    Add {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Where the money came from
        #[arg(short, long)]
        source: String,

        /// Amount (at least 1)
        #[arg(short, long)]
        amount: f64,

        /// Category: salary, freelance, business, investments, rental,
        /// dividends, pension, social_security, gifts, other
        #[arg(short, long, default_value = "salary")]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List a user's incomes
    List {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// Record an expense
    Add {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// What the money was spent on
        #[arg(long)]
        description: String,

        /// Amount (greater than 0)
        #[arg(short, long)]
        amount: f64,

        /// Category
        #[arg(short, long)]
        category: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Payment method (defaults to Cash)
        #[arg(long)]
        payment_method: Option<String>,
    },

    /// List a user's expenses
    List {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },
}
