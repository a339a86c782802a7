//! Pennywise Core Library
//!
//! Shared functionality for the Pennywise personal finance tracker:
//! - Database access and migrations (SQLite, optional SQLCipher encryption)
//! - Domain models for users, incomes, expenses, budgets, goals, alerts, reports
//! - Analytics aggregator (totals, forecast, risk index, recommendations)
//! - Password hashing and input validation
//! - Configuration file loading
//! - CSV export

pub mod analytics;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod store;
pub mod validation;

pub use analytics::{
    Analytics, AnalyticsConfig, AnalyticsEngine, AnalyticsResult, CategoryTotalsMode,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use db::{AuditEntry, Database, TransactionFilter};
pub use error::{Error, Result};
pub use export::{CsvExport, TransactionExportOptions};
pub use store::TransactionStore;
