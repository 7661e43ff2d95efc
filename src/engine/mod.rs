//! Ledger engine — pure folds over the roster and game history.
//!
//! No I/O, no mutation, no caching: every read recomputes from scratch,
//! which is fine at personal-ledger scale. Callers re-invoke after each
//! change to the underlying collections.

pub mod stats;
pub mod trend;

pub use stats::{game_investment, game_results, player_stats, win_distribution};
pub use trend::profit_trend;
