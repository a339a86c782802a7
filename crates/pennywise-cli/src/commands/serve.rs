//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use pennywise_core::AppConfig;
use pennywise_server::{ServerConfig, DEFAULT_TOKEN_TTL_DAYS};

use super::open_db;

/// Merge the config file with `PENNYWISE_*` environment values
///
/// The secret is required. Origins from the environment replace those from
/// the config file.
pub fn build_server_config(
    app: &AppConfig,
    jwt_secret: Option<String>,
    allowed_origins: Option<String>,
    token_ttl_days: Option<String>,
) -> Result<ServerConfig> {
    let jwt_secret = jwt_secret
        .filter(|s| !s.trim().is_empty())
        .context("PENNYWISE_JWT_SECRET must be set to start the server")?;

    let allowed_origins = match allowed_origins {
        Some(origins) => origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => app.server.allowed_origins.clone(),
    };

    let token_ttl_days = match token_ttl_days {
        Some(days) => {
            let days: i64 = days
                .trim()
                .parse()
                .with_context(|| format!("Invalid PENNYWISE_TOKEN_TTL_DAYS: {}", days))?;
            anyhow::ensure!(days > 0, "PENNYWISE_TOKEN_TTL_DAYS must be positive");
            days
        }
        None => DEFAULT_TOKEN_TTL_DAYS,
    };

    Ok(ServerConfig {
        jwt_secret,
        token_ttl_days,
        allowed_origins,
        analytics: app.analytics,
    })
}

pub async fn cmd_serve(
    db_path: &Path,
    no_encrypt: bool,
    app: &AppConfig,
    host: Option<&str>,
    port: Option<u16>,
    static_dir: Option<&Path>,
) -> Result<()> {
    let host = host.unwrap_or(&app.server.host);
    let port = port.unwrap_or(app.server.port);

    let config = build_server_config(
        app,
        std::env::var("PENNYWISE_JWT_SECRET").ok(),
        std::env::var("PENNYWISE_ALLOWED_ORIGINS").ok(),
        std::env::var("PENNYWISE_TOKEN_TTL_DAYS").ok(),
    )?;

    println!("🚀 Starting Pennywise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!(
        "   📊 Analytics window: {} months",
        config.analytics.window_months
    );
    println!("   🔑 Session tokens valid for {} days", config.token_ttl_days);

    let db = open_db(db_path, no_encrypt)?;
    let static_dir = match static_dir {
        Some(dir) => Some(dir.to_str().context("Static dir path is not valid UTF-8")?),
        None => None,
    };

    pennywise_server::serve_with_config(db, host, port, static_dir, config).await
}
