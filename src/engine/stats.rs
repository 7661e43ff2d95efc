//! Per-game results, leaderboard statistics, and win distribution.
//!
//! All functions here are deterministic in-memory folds over
//! already-validated data. Malformed records are a precondition
//! violation caught at the ingestion boundary, never here.

use rust_decimal::Decimal;

use crate::types::{resolve_name, Game, GameResult, Player, PlayerStats, WinDistributionEntry};

/// A participant's total investment in one game: fee plus bet total.
pub fn game_investment(fee: Decimal, total_bet: Decimal) -> Decimal {
    fee + total_bet
}

/// Per-participant outcomes for one game, in the game's stored player order.
///
/// The winner's profit is the pot minus their own investment; everyone
/// else loses exactly what they invested. Names of players deleted after
/// the game was recorded resolve to the `"Unknown"` label.
pub fn game_results(game: &Game, players: &[Player]) -> Vec<GameResult> {
    game.players
        .iter()
        .map(|pb| {
            let invested = game_investment(game.participation_fee, pb.total_bet);
            let is_winner = game.is_winner(&pb.player_id);
            let profit_loss = if is_winner {
                game.pot_total - invested
            } else {
                -invested
            };
            GameResult {
                player_id: pb.player_id.clone(),
                player_name: resolve_name(players, &pb.player_id),
                invested,
                profit_loss,
                is_winner,
            }
        })
        .collect()
}

/// Aggregate statistics for every roster player, sorted descending by
/// net profit.
///
/// Ties keep roster (creation) order — the sort is stable over the input
/// order, so two players with identical net profit stay deterministic.
/// Players with no games get zeroed stats and a win rate of 0.
pub fn player_stats(players: &[Player], games: &[Game]) -> Vec<PlayerStats> {
    let mut stats: Vec<PlayerStats> = players
        .iter()
        .map(|player| {
            let mut games_played = 0u64;
            let mut games_won = 0u64;
            let mut total_invested = Decimal::ZERO;
            let mut total_won = Decimal::ZERO;

            for game in games {
                let Some(pb) = game.participant(&player.id) else {
                    continue;
                };
                games_played += 1;
                total_invested += game_investment(game.participation_fee, pb.total_bet);
                if game.is_winner(&player.id) {
                    games_won += 1;
                    // Raw pot received; the player's own stake is already
                    // counted on the invested side of the subtraction.
                    total_won += game.pot_total;
                }
            }

            let win_rate = if games_played == 0 {
                0.0
            } else {
                (games_won as f64 / games_played as f64) * 100.0
            };

            PlayerStats {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                games_played,
                games_won,
                total_invested,
                total_won,
                net_profit_loss: total_won - total_invested,
                win_rate,
            }
        })
        .collect();

    // Richest player first. Vec::sort_by is stable.
    stats.sort_by(|a, b| b.net_profit_loss.cmp(&a.net_profit_loss));
    stats
}

/// Win counts for charting, projected from already-sorted stats.
///
/// Players with no games are dropped; the remaining order follows the
/// net-profit-sorted input, not the win count.
pub fn win_distribution(stats: &[PlayerStats]) -> Vec<WinDistributionEntry> {
    stats
        .iter()
        .filter(|ps| ps.games_played > 0)
        .map(|ps| WinDistributionEntry {
            name: ps.player_name.clone(),
            value: ps.games_won,
            win_rate: ps.win_rate,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
