//! Persistence boundary.
//!
//! Defines the `LedgerStore` trait the session layer writes through, and
//! provides the `JsonStore` single-file implementation used for a local
//! personal ledger. A remote data store plugs in behind the same trait.

pub mod json;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Game, Player};

pub use json::JsonStore;

/// Abstraction over the external data store.
///
/// Every write is all-or-nothing: on error, nothing may have been
/// persisted. The session layer relies on this to keep its in-memory
/// collections consistent with the last-known-good persisted state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch the full roster, ordered by creation time.
    async fn load_players(&self) -> Result<Vec<Player>>;

    /// Fetch the full game history with resolved bet records.
    async fn load_games(&self) -> Result<Vec<Game>>;

    /// Persist a new player.
    async fn create_player(&self, player: &Player) -> Result<()>;

    /// Update a player's display name.
    async fn rename_player(&self, id: &str, name: &str) -> Result<()>;

    /// Remove a player from the roster. Historical games referencing the
    /// player are left untouched.
    async fn delete_player(&self, id: &str) -> Result<()>;

    /// Persist a new game together with its bet records.
    async fn create_game(&self, game: &Game) -> Result<()>;

    /// Remove a game and its bet records.
    async fn delete_game(&self, id: &str) -> Result<()>;

    /// Store name for logging and identification.
    fn name(&self) -> &str;
}
