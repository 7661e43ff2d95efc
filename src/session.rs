//! Session layer — the single logical owner of the in-memory ledger.
//!
//! Holds the roster, the game history, and the default participation fee.
//! Mutations are delegated to the store first; in-memory state is updated
//! only after the write succeeds, so a failed write never leaves derived
//! statistics drifting from the persisted source of truth. Reads recompute
//! through the engine from scratch.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine;
use crate::storage::LedgerStore;
use crate::types::{
    Game, GameResult, LedgerError, Player, PlayerBet, PlayerStats, TrendPoint,
    WinDistributionEntry,
};

// ---------------------------------------------------------------------------
// Request / summary types
// ---------------------------------------------------------------------------

/// One participant's raw input when recording a game: who played, and
/// their bets as free text (`"1, 4, 8, 20"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEntry {
    pub player_id: String,
    #[serde(default)]
    pub bets: String,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub total_games: usize,
    pub total_pot: Decimal,
    pub top_player: Option<String>,
    pub biggest_profit: Decimal,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct LedgerSession {
    store: Box<dyn LedgerStore>,
    players: Vec<Player>,
    games: Vec<Game>,
    default_fee: Decimal,
}

impl LedgerSession {
    /// Open a session by loading the full roster and history from the store.
    pub async fn open(store: Box<dyn LedgerStore>, default_fee: Decimal) -> Result<Self> {
        let players = store.load_players().await?;
        let games = store.load_games().await?;
        info!(
            store = store.name(),
            players = players.len(),
            games = games.len(),
            "Ledger session opened"
        );
        Ok(LedgerSession {
            store,
            players,
            games,
            default_fee,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn default_fee(&self) -> Decimal {
        self.default_fee
    }

    /// Change the default participation fee. Only games recorded after this
    /// call use the new fee; past games keep the fee frozen at creation.
    pub fn set_default_fee(&mut self, fee: Decimal) {
        info!(old = %self.default_fee, new = %fee, "Default participation fee changed");
        self.default_fee = fee;
    }

    // -- mutations ---------------------------------------------------------

    pub async fn add_player(&mut self, name: &str) -> Result<Player> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyPlayerName.into());
        }
        let player = Player::new(trimmed);
        self.store.create_player(&player).await?;
        info!(player = %player, "Player added");
        self.players.push(player.clone());
        Ok(player)
    }

    pub async fn rename_player(&mut self, id: &str, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyPlayerName.into());
        }
        if !self.players.iter().any(|p| p.id == id) {
            return Err(LedgerError::PlayerNotFound(id.to_string()).into());
        }
        self.store.rename_player(id, trimmed).await?;
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.name = trimmed.to_string();
        }
        Ok(())
    }

    /// Remove a player from the active roster. Their historical games stay;
    /// results for those games fall back to the `"Unknown"` label.
    pub async fn remove_player(&mut self, id: &str) -> Result<()> {
        if !self.players.iter().any(|p| p.id == id) {
            return Err(LedgerError::PlayerNotFound(id.to_string()).into());
        }
        self.store.delete_player(id).await?;
        self.players.retain(|p| p.id != id);
        info!(player_id = id, "Player removed from roster");
        Ok(())
    }

    /// Parse, validate, and record a new game at the current default fee.
    ///
    /// Rejections (too few participants, unknown player, winner not
    /// playing) happen before any state is touched.
    pub async fn record_game(&mut self, entries: &[GameEntry], winner_id: &str) -> Result<Game> {
        for entry in entries {
            if !self.players.iter().any(|p| p.id == entry.player_id) {
                return Err(LedgerError::PlayerNotFound(entry.player_id.clone()).into());
            }
        }

        let bets: Vec<PlayerBet> = entries
            .iter()
            .map(|e| PlayerBet::from_input(&e.player_id, &e.bets))
            .collect();

        let game = Game::record(self.default_fee, bets, winner_id)?;
        self.store.create_game(&game).await?;
        info!(game = %game, winner = winner_id, "Game recorded");
        self.games.push(game.clone());
        Ok(game)
    }

    pub async fn remove_game(&mut self, id: &str) -> Result<()> {
        if !self.games.iter().any(|g| g.id == id) {
            return Err(LedgerError::GameNotFound(id.to_string()).into());
        }
        self.store.delete_game(id).await?;
        self.games.retain(|g| g.id != id);
        warn!(game_id = id, "Game deleted from history");
        Ok(())
    }

    // -- derived reads -----------------------------------------------------

    /// Leaderboard statistics, sorted descending by net profit.
    pub fn stats(&self) -> Vec<PlayerStats> {
        engine::player_stats(&self.players, &self.games)
    }

    /// Cumulative profit trend, keyed by player id.
    pub fn trend(&self) -> Vec<TrendPoint> {
        engine::profit_trend(&self.games)
    }

    /// Win distribution over players who have played at least one game.
    pub fn win_distribution(&self) -> Vec<WinDistributionEntry> {
        engine::win_distribution(&self.stats())
    }

    /// Per-participant outcomes for one game.
    pub fn game_results(&self, game_id: &str) -> Result<Vec<GameResult>> {
        let game = self
            .games
            .iter()
            .find(|g| g.id == game_id)
            .ok_or_else(|| LedgerError::GameNotFound(game_id.to_string()))?;
        Ok(engine::game_results(game, &self.players))
    }

    /// Headline figures: game count, money in play, current leader.
    pub fn summary(&self) -> LedgerSummary {
        let stats = self.stats();
        LedgerSummary {
            total_games: self.games.len(),
            total_pot: self.games.iter().map(|g| g.pot_total).sum(),
            top_player: stats.first().map(|s| s.player_name.clone()),
            biggest_profit: stats
                .iter()
                .map(|s| s.net_profit_loss)
                .max()
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
