//! # Pay-Console Host
//!
//! Demo host for the console state core: assembles the store against a live
//! platform, bootstraps the session partitions, and tails the notification
//! feed until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use console_runtime::{live_store, ConsoleConfig};

#[derive(Debug, Parser)]
#[command(name = "pay-console", about = "Headless console state core host")]
struct Args {
    /// Base URL of the platform REST API.
    #[arg(long)]
    api_url: Option<String>,

    /// URL of the push channel endpoint.
    #[arg(long)]
    ws_url: Option<String>,

    /// Path of the local preference file.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Path of a JSON file with the authenticated merchant record.
    #[arg(long)]
    merchant: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut config = ConsoleConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(url) = args.ws_url {
        config.websocket_url = url;
    }
    if let Some(path) = args.prefs {
        config.prefs_path = path;
    }

    info!(api_url = %config.api_url, ws_url = %config.websocket_url, "assembling store");
    let store = live_store(&config).context("failed to assemble root store")?;

    if let Some(path) = args.merchant {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read merchant record {}", path.display()))?;
        let record: Value =
            serde_json::from_str(&raw).context("merchant record is not valid JSON")?;
        store
            .bootstrap("User.Merchant", record)
            .await
            .context("merchant bootstrap failed")?;
        store
            .bootstrap("User.Notifications", Value::Null)
            .await
            .context("notifications bootstrap failed")?;
    } else {
        warn!("no merchant record provided, notification watch stays off");
    }

    store
        .bootstrap("Dictionaries", Value::Null)
        .await
        .context("dictionaries bootstrap failed")?;

    info!(namespaces = ?store.namespaces(), "store ready");

    let mut feed_tick = tokio::time::interval(Duration::from_secs(30));
    loop {
        tokio::select! {
            _ = feed_tick.tick() => {
                if let Ok(unread) = store.getter("User.Notifications/unreadCount") {
                    info!(%unread, "notification feed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
