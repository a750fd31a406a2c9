//! STAKELINE — bet ledger with a running balance history.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the in-memory account and serves the dashboard until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use stakeline::account::AccountState;
use stakeline::config;
use stakeline::dashboard::{self, routes::DashboardState};

const BANNER: &str = r#"
 ____  _        _        _     _
/ ___|| |_ __ _| | _____| |   (_)_ __   ___
\___ \| __/ _` | |/ / _ \ |   | | '_ \ / _ \
 ___) | || (_| |   <  __/ |___| | | | |  __/
|____/ \__\__,_|_|\_\___|_____|_|_| |_|\___|

  Bet ledger & balance history
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("STAKELINE_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = config::AppConfig::load_or_default(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        name = %cfg.tracker.name,
        currency = %cfg.tracker.currency_symbol,
        order = %cfg.tracker.accumulation_order,
        "STAKELINE starting up"
    );

    let mut account = AccountState::with_order(cfg.tracker.accumulation_order);
    if let Some(initial) = cfg.tracker.initial_balance {
        account.set_base_balance(initial)?;
    }

    if !cfg.dashboard.enabled {
        warn!("Dashboard disabled in config; nothing to serve. Exiting.");
        return Ok(());
    }

    let state = Arc::new(DashboardState::new(
        account,
        cfg.tracker.name.clone(),
        cfg.tracker.currency_symbol.clone(),
    ));

    dashboard::serve(state.clone(), cfg.dashboard.port, shutdown_signal()).await?;

    let account = state.account.read().await;
    info!(
        balance = format!("{} {:.2}", cfg.tracker.currency_symbol, account.current_balance()),
        bets = account.bets().len(),
        "STAKELINE shut down cleanly."
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stakeline=info"));

    if std::env::var("STAKELINE_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
