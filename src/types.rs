//! Shared types for the TALLY ledger.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that engine, store, and
//! session modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display label for participants whose player record has since been deleted.
/// Deleted players are never purged from historical games.
pub const UNKNOWN_PLAYER: &str = "Unknown";

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A member of the roster. Renamable and deletable; deletion does not
/// cascade into the game history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with a fresh id, trimming the given name.
    pub fn new(name: &str) -> Self {
        Player {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// Resolve a player id against the roster, falling back to the
/// `"Unknown"` label for players deleted after their games were recorded.
pub fn resolve_name(players: &[Player], player_id: &str) -> String {
    players
        .iter()
        .find(|p| p.id == player_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

// ---------------------------------------------------------------------------
// PlayerBet
// ---------------------------------------------------------------------------

/// One participant's bets within a single game. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBet {
    pub player_id: String,
    /// Individual bet amounts, in the order they were placed.
    pub bets: Vec<Decimal>,
    /// Sum of `bets`.
    pub total_bet: Decimal,
}

impl PlayerBet {
    /// Build from an explicit list of bet amounts.
    pub fn new(player_id: &str, bets: Vec<Decimal>) -> Self {
        let total_bet = bets.iter().sum();
        PlayerBet {
            player_id: player_id.to_string(),
            bets,
            total_bet,
        }
    }

    /// Build from free-text input like `"1, 4, 8, 20"`.
    ///
    /// Tokens that fail to parse as a number, and amounts that are not
    /// strictly positive, are discarded before totaling.
    pub fn from_input(player_id: &str, input: &str) -> Self {
        Self::new(player_id, parse_bets(input))
    }
}

impl fmt::Display for PlayerBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} bet(s) totalling {}", self.player_id, self.bets.len(), self.total_bet)
    }
}

/// Parse a comma-separated bet string into positive amounts.
///
/// `"1, 4, 8, 20"` -> `[1, 4, 8, 20]`; `"abc, -5, 0, 3"` -> `[3]`.
pub fn parse_bets(input: &str) -> Vec<Decimal> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input
        .split(',')
        .filter_map(|token| Decimal::from_str(token.trim()).ok())
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
        .collect()
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// An immutable historical record of one game.
///
/// The participation fee is frozen at creation — later changes to the
/// session's default fee never retroactively alter past games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub participation_fee: Decimal,
    pub players: Vec<PlayerBet>,
    pub winner_id: String,
    /// Invariant: `pot_total == Σ (participation_fee + total_bet)` over `players`.
    pub pot_total: Decimal,
}

impl Game {
    /// Validate and record a new game.
    ///
    /// Rejects before any mutation: fewer than two participants, a winner
    /// who is not among the participants, or a duplicate participant.
    pub fn record(
        participation_fee: Decimal,
        players: Vec<PlayerBet>,
        winner_id: &str,
    ) -> Result<Self, LedgerError> {
        if players.len() < 2 {
            return Err(LedgerError::TooFewParticipants { got: players.len() });
        }
        for (i, pb) in players.iter().enumerate() {
            if players[..i].iter().any(|other| other.player_id == pb.player_id) {
                return Err(LedgerError::DuplicateParticipant(pb.player_id.clone()));
            }
        }
        if !players.iter().any(|pb| pb.player_id == winner_id) {
            return Err(LedgerError::WinnerNotParticipating(winner_id.to_string()));
        }

        let pot_total = players
            .iter()
            .map(|pb| participation_fee + pb.total_bet)
            .sum();

        Ok(Game {
            id: uuid::Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            participation_fee,
            players,
            winner_id: winner_id.to_string(),
            pot_total,
        })
    }

    /// The bet record for a given player, if they participated.
    pub fn participant(&self, player_id: &str) -> Option<&PlayerBet> {
        self.players.iter().find(|pb| pb.player_id == player_id)
    }

    /// Whether the given player won this game.
    pub fn is_winner(&self, player_id: &str) -> bool {
        self.winner_id == player_id
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game {} | {} players | fee {} | pot {}",
            self.id,
            self.players.len(),
            self.participation_fee,
            self.pot_total,
        )
    }
}

// ---------------------------------------------------------------------------
// Derived views (never stored)
// ---------------------------------------------------------------------------

/// Per-player aggregate statistics, recomputed from the full history on
/// every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: String,
    pub player_name: String,
    pub games_played: u64,
    pub games_won: u64,
    pub total_invested: Decimal,
    /// Raw pot received on wins. The player's own stake is not subtracted
    /// here; net profit accounts for it via `total_invested`.
    pub total_won: Decimal,
    pub net_profit_loss: Decimal,
    /// Percentage in `[0, 100]`; 0 when no games were played.
    pub win_rate: f64,
}

impl fmt::Display for PlayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | played={} won={} | invested={} won_total={} | net={} | win_rate={:.1}%",
            self.player_name,
            self.games_played,
            self.games_won,
            self.total_invested,
            self.total_won,
            self.net_profit_loss,
            self.win_rate,
        )
    }
}

/// One participant's outcome within a single game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub player_id: String,
    pub player_name: String,
    pub invested: Decimal,
    pub profit_loss: Decimal,
    pub is_winner: bool,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.profit_loss.is_sign_negative() { "" } else { "+" };
        write!(
            f,
            "{} invested={} pnl={sign}{}{}",
            self.player_name,
            self.invested,
            self.profit_loss,
            if self.is_winner { " (winner)" } else { "" },
        )
    }
}

/// One point of the cumulative profit trend, at a 1-based game index.
///
/// Totals are keyed by stable player id; display names are resolved at the
/// presentation boundary so a rename never merges or splits trend history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub game: usize,
    /// Cumulative profit/loss per player id, forward-filled for players
    /// absent from this game but present in an earlier one.
    pub totals: std::collections::BTreeMap<String, Decimal>,
}

/// One slice of the win-distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinDistributionEntry {
    pub name: String,
    /// Number of games won.
    pub value: u64,
    pub win_rate: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for TALLY.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("A game needs at least 2 participants, got {got}")]
    TooFewParticipants { got: usize },

    #[error("Winner {0} is not among the participants")]
    WinnerNotParticipating(String),

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
