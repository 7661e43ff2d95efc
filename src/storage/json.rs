//! Single-file JSON store.
//!
//! Saves and loads the whole ledger to/from one pretty-printed JSON file.
//! Each mutation is a read-modify-write of the full snapshot, which is
//! plenty for a personal ledger; a database-backed store can replace this
//! behind the `LedgerStore` trait if histories ever grow large.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::storage::LedgerStore;
use crate::types::{Game, LedgerError, Player};

/// On-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    players: Vec<Player>,
    games: Vec<Game>,
}

/// A `LedgerStore` backed by a single JSON file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    /// Read the snapshot. A missing file means a fresh start.
    fn read(&self) -> Result<LedgerFile> {
        if !Path::new(&self.path).exists() {
            info!(path = %self.path.display(), "No ledger file found, starting fresh");
            return Ok(LedgerFile::default());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger from {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse ledger from {}", self.path.display()))
    }

    /// Write the snapshot back in full.
    fn write(&self, file: &LedgerFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file).context("Failed to serialise ledger")?;
        std::fs::write(&self.path, &json)
            .with_context(|| format!("Failed to write ledger to {}", self.path.display()))?;
        debug!(
            path = %self.path.display(),
            players = file.players.len(),
            games = file.games.len(),
            "Ledger saved"
        );
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for JsonStore {
    async fn load_players(&self) -> Result<Vec<Player>> {
        Ok(self.read()?.players)
    }

    async fn load_games(&self) -> Result<Vec<Game>> {
        Ok(self.read()?.games)
    }

    async fn create_player(&self, player: &Player) -> Result<()> {
        let mut file = self.read()?;
        file.players.push(player.clone());
        self.write(&file)
    }

    async fn rename_player(&self, id: &str, name: &str) -> Result<()> {
        let mut file = self.read()?;
        let player = file
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::PlayerNotFound(id.to_string()))?;
        player.name = name.trim().to_string();
        self.write(&file)
    }

    async fn delete_player(&self, id: &str) -> Result<()> {
        let mut file = self.read()?;
        let before = file.players.len();
        file.players.retain(|p| p.id != id);
        if file.players.len() == before {
            return Err(LedgerError::PlayerNotFound(id.to_string()).into());
        }
        // Games referencing the player stay — the ledger is append-only.
        self.write(&file)
    }

    async fn create_game(&self, game: &Game) -> Result<()> {
        let mut file = self.read()?;
        file.games.push(game.clone());
        self.write(&file)
    }

    async fn delete_game(&self, id: &str) -> Result<()> {
        let mut file = self.read()?;
        let before = file.games.len();
        file.games.retain(|g| g.id != id);
        if file.games.len() == before {
            return Err(LedgerError::GameNotFound(id.to_string()).into());
        }
        self.write(&file)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerBet;
    use rust_decimal_macros::dec;

    fn temp_store() -> JsonStore {
        let mut p = std::env::temp_dir();
        p.push(format!("tally_test_ledger_{}.json", uuid::Uuid::new_v4()));
        JsonStore::new(p)
    }

    fn cleanup(store: &JsonStore) {
        let _ = std::fs::remove_file(&store.path);
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let store = temp_store();
        assert!(store.load_players().await.unwrap().is_empty());
        assert!(store.load_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_load_player() {
        let store = temp_store();
        let player = Player::new("Rahul");
        store.create_player(&player).await.unwrap();

        let players = store.load_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, player.id);
        assert_eq!(players[0].name, "Rahul");

        cleanup(&store);
    }

    #[tokio::test]
    async fn test_rename_player() {
        let store = temp_store();
        let player = Player::new("Amit");
        store.create_player(&player).await.unwrap();
        store.rename_player(&player.id, "  Amitabh ").await.unwrap();

        let players = store.load_players().await.unwrap();
        assert_eq!(players[0].name, "Amitabh");

        cleanup(&store);
    }

    #[tokio::test]
    async fn test_rename_missing_player_fails() {
        let store = temp_store();
        let err = store.rename_player("ghost", "X").await.unwrap_err();
        assert!(err.to_string().contains("ghost"));
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_delete_player_keeps_games() {
        let store = temp_store();
        let a = Player::new("A");
        let b = Player::new("B");
        store.create_player(&a).await.unwrap();
        store.create_player(&b).await.unwrap();

        let game = Game::record(
            dec!(1),
            vec![
                PlayerBet::from_input(&a.id, "4"),
                PlayerBet::from_input(&b.id, ""),
            ],
            &a.id,
        )
        .unwrap();
        store.create_game(&game).await.unwrap();

        store.delete_player(&b.id).await.unwrap();

        let players = store.load_players().await.unwrap();
        assert_eq!(players.len(), 1);
        let games = store.load_games().await.unwrap();
        assert_eq!(games.len(), 1);
        assert!(games[0].participant(&b.id).is_some());

        cleanup(&store);
    }

    #[tokio::test]
    async fn test_create_and_delete_game() {
        let store = temp_store();
        let game = Game::record(
            dec!(1),
            vec![
                PlayerBet::from_input("a", "4"),
                PlayerBet::from_input("b", ""),
            ],
            "a",
        )
        .unwrap();
        store.create_game(&game).await.unwrap();
        assert_eq!(store.load_games().await.unwrap().len(), 1);

        store.delete_game(&game.id).await.unwrap();
        assert!(store.load_games().await.unwrap().is_empty());

        cleanup(&store);
    }

    #[tokio::test]
    async fn test_delete_missing_game_fails() {
        let store = temp_store();
        assert!(store.delete_game("nope").await.is_err());
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let store = temp_store();
        let player = Player::new("Priya");
        store.create_player(&player).await.unwrap();

        let reopened = JsonStore::new(store.path.clone());
        let players = reopened.load_players().await.unwrap();
        assert_eq!(players[0].name, "Priya");

        cleanup(&store);
    }
}
