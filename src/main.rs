//! TALLY — Personal card-game ledger
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the ledger store, and serves the dashboard until shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use tally::config::AppConfig;
use tally::dashboard;
use tally::dashboard::routes::DashboardState;
use tally::session::LedgerSession;
use tally::storage::JsonStore;

const BANNER: &str = r#"
 _____  _    _     _  __   __
|_   _|/ \  | |   | | \ \ / /
  | | / _ \ | |   | |  \ V /
  | |/ ___ \| |___| |___| |
  |_/_/   \_\_____|_____|_|

  Personal Card-Game Ledger
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        ledger = %cfg.ledger.name,
        default_fee = %cfg.ledger.default_fee,
        currency = %cfg.ledger.currency,
        store = %cfg.store.path,
        "TALLY starting up"
    );

    // -- Open the ledger ---------------------------------------------------

    let store = JsonStore::new(cfg.store.path.clone());
    let session = LedgerSession::open(Box::new(store), cfg.ledger.default_fee).await?;

    let summary = session.summary();
    info!(
        players = session.players().len(),
        games = summary.total_games,
        total_pot = %summary.total_pot,
        leader = summary.top_player.as_deref().unwrap_or("-"),
        "Ledger loaded"
    );

    // -- Serve -------------------------------------------------------------

    if !cfg.dashboard.enabled {
        // Headless mode: print the leaderboard and exit.
        for stat in session.stats() {
            info!("{stat}");
        }
        return Ok(());
    }

    let state = Arc::new(DashboardState::new(
        session,
        &cfg.ledger.name,
        &cfg.ledger.currency,
    ));
    dashboard::serve(state, cfg.dashboard.port).await?;

    info!("TALLY shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tally=info"));

    let json_logging = std::env::var("TALLY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
