//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, date parsing)
//! - `serve` - Web server command
//! - `users` - User account commands (list, add, promote)
//! - `incomes` - Income commands (add, list)
//! - `expenses` - Expense commands (add, list)
//! - `analytics` - Analytics report for a user
//! - `export` - CSV export of a user's transactions

pub mod analytics;
pub mod core;
pub mod expenses;
pub mod export;
pub mod incomes;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use expenses::*;
pub use export::*;
pub use incomes::*;
pub use serve::*;
pub use users::*;
