//! CSV export of the leaderboard statistics.
//!
//! Tabular projection of `PlayerStats` for archival and reporting.
//! Row order follows the input, so the export shares the leaderboard's
//! net-profit ordering.

use crate::types::PlayerStats;

const HEADERS: [&str; 7] = [
    "Player",
    "Games Played",
    "Games Won",
    "Win Rate %",
    "Total Invested",
    "Total Won",
    "Net P/L",
];

/// Render statistics as CSV. Zero rows is not an error — the result is
/// just the header line.
pub fn stats_to_csv(stats: &[PlayerStats]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.join(","));
    out.push('\n');

    for s in stats {
        out.push_str(&format!(
            "{},{},{},{:.1},{},{},{}\n",
            escape_field(&s.player_name),
            s.games_played,
            s.games_won,
            s.win_rate,
            s.total_invested,
            s.total_won,
            s.net_profit_loss,
        ));
    }

    out
}

/// Quote a field when it would break the row.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
