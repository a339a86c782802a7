//! Export command

use std::path::Path;

use anyhow::{Context, Result};
use pennywise_core::db::Database;
use pennywise_core::TransactionExportOptions;

use super::parse_date;

pub fn cmd_export(
    db: &Database,
    user_id: i64,
    file: &Path,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let opts = TransactionExportOptions {
        from: parse_date(from)?,
        to: parse_date(to)?,
    };
    if opts.from.is_some() != opts.to.is_some() {
        println!("⚠️  --from and --to only filter when both are given");
    }

    let rows = db
        .export_transactions_to_file(user_id, &opts, file)
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!("✅ Exported {} transactions to {}", rows, file.display());
    Ok(())
}
