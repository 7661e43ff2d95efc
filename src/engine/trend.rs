//! Cumulative profit trend for line charts.
//!
//! Walks the game history in chronological order and maintains a running
//! profit/loss total per player, emitting one point per game.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::engine::stats::game_investment;
use crate::types::{Game, TrendPoint};

/// Cumulative profit/loss per player, one point per game at a 1-based index.
///
/// Games are ordered ascending by timestamp; the sort is stable, so games
/// recorded at the same instant keep their insertion order. Totals are
/// keyed by stable player id — resolve ids to display names at the
/// presentation boundary, never here, so a rename cannot merge two
/// players' histories.
///
/// Points are forward-filled: a player absent from game `i` but present
/// in an earlier game keeps their last total at point `i`, which gives
/// charting consumers a continuous line per player.
pub fn profit_trend(games: &[Game]) -> Vec<TrendPoint> {
    let mut ordered: Vec<&Game> = games.iter().collect();
    ordered.sort_by_key(|g| g.recorded_at);

    let mut running: BTreeMap<String, Decimal> = BTreeMap::new();

    ordered
        .iter()
        .enumerate()
        .map(|(index, game)| {
            for pb in &game.players {
                let invested = game_investment(game.participation_fee, pb.total_bet);
                let profit_loss = if game.is_winner(&pb.player_id) {
                    game.pot_total - invested
                } else {
                    -invested
                };
                *running.entry(pb.player_id.clone()).or_insert(Decimal::ZERO) += profit_loss;
            }

            TrendPoint {
                game: index + 1,
                totals: running.clone(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
