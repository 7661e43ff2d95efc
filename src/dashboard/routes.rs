//! Dashboard API route handlers.
//!
//! All endpoints return JSON (the CSV export aside). The session is
//! shared via `Arc<DashboardState>`; mutations take the write lock,
//! reads the read lock.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::export;
use crate::session::{GameEntry, LedgerSession};
use crate::types::{resolve_name, Game, GameResult, LedgerError, Player, PlayerStats, WinDistributionEntry};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub session: RwLock<LedgerSession>,
    pub ledger_name: String,
    pub currency: String,
}

impl DashboardState {
    pub fn new(session: LedgerSession, ledger_name: &str, currency: &str) -> Self {
        Self {
            session: RwLock::new(session),
            ledger_name: ledger_name.to_string(),
            currency: currency.to_string(),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenamePlayerRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordGameRequest {
    pub entries: Vec<GameEntry>,
    pub winner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FeeRequest {
    pub fee: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub ledger: String,
    pub currency: String,
    pub total_players: usize,
    pub total_games: usize,
    pub total_pot: Decimal,
    pub top_player: Option<String>,
    pub biggest_profit: Decimal,
    pub default_fee: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Map a session error to an HTTP status with a JSON body.
///
/// Validation failures are the caller's fault (422), missing records are
/// 404, and anything else is a store-side 500.
fn error_response(err: anyhow::Error) -> (StatusCode, Json<ErrorBody>) {
    let status = match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::PlayerNotFound(_)) | Some(LedgerError::GameNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        Some(
            LedgerError::TooFewParticipants { .. }
            | LedgerError::WinnerNotParticipating(_)
            | LedgerError::DuplicateParticipant(_)
            | LedgerError::EmptyPlayerName,
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// GET /api/players
pub async fn get_players(State(state): State<AppState>) -> Json<Vec<Player>> {
    let session = state.session.read().await;
    Json(session.players().to_vec())
}

/// GET /api/games
pub async fn get_games(State(state): State<AppState>) -> Json<Vec<Game>> {
    let session = state.session.read().await;
    Json(session.games().to_vec())
}

/// GET /api/games/{id}/results
pub async fn get_game_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GameResult>>, (StatusCode, Json<ErrorBody>)> {
    let session = state.session.read().await;
    session.game_results(&id).map(Json).map_err(error_response)
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<Vec<PlayerStats>> {
    let session = state.session.read().await;
    Json(session.stats())
}

/// GET /api/trend
///
/// Trend points come out of the engine keyed by player id; this is the
/// presentation boundary, so ids are resolved to current display names
/// here (deleted players show as `"Unknown"`).
pub async fn get_trend(State(state): State<AppState>) -> Json<Vec<serde_json::Value>> {
    let session = state.session.read().await;
    let players = session.players();

    let points = session
        .trend()
        .into_iter()
        .map(|point| {
            let mut obj = serde_json::Map::new();
            obj.insert("game".to_string(), serde_json::json!(point.game));
            for (player_id, total) in &point.totals {
                let name = resolve_name(players, player_id);
                obj.insert(name, serde_json::json!(total));
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    Json(points)
}

/// GET /api/win-distribution
pub async fn get_win_distribution(
    State(state): State<AppState>,
) -> Json<Vec<WinDistributionEntry>> {
    let session = state.session.read().await;
    Json(session.win_distribution())
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let session = state.session.read().await;
    let summary = session.summary();
    Json(SummaryResponse {
        ledger: state.ledger_name.clone(),
        currency: state.currency.clone(),
        total_players: session.players().len(),
        total_games: summary.total_games,
        total_pot: summary.total_pot,
        top_player: summary.top_player,
        biggest_profit: summary.biggest_profit,
        default_fee: session.default_fee(),
    })
}

/// GET /api/export.csv
pub async fn get_export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let csv = export::stats_to_csv(&session.stats());
    ([(header::CONTENT_TYPE, "text/csv")], csv)
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Mutation handlers
// ---------------------------------------------------------------------------

/// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), (StatusCode, Json<ErrorBody>)> {
    let mut session = state.session.write().await;
    session
        .add_player(&req.name)
        .await
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(error_response)
}

/// PUT /api/players/{id}
pub async fn rename_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenamePlayerRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let mut session = state.session.write().await;
    session
        .rename_player(&id, &req.name)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

/// DELETE /api/players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let mut session = state.session.write().await;
    session
        .remove_player(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

/// POST /api/games
pub async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<RecordGameRequest>,
) -> Result<(StatusCode, Json<Game>), (StatusCode, Json<ErrorBody>)> {
    let mut session = state.session.write().await;
    session
        .record_game(&req.entries, &req.winner_id)
        .await
        .map(|g| (StatusCode::CREATED, Json(g)))
        .map_err(error_response)
}

/// DELETE /api/games/{id}
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let mut session = state.session.write().await;
    session
        .remove_game(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

/// PUT /api/settings/fee
pub async fn set_fee(
    State(state): State<AppState>,
    Json(req): Json<FeeRequest>,
) -> StatusCode {
    let mut session = state.session.write().await;
    session.set_default_fee(req.fee);
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use rust_decimal_macros::dec;

    async fn test_state() -> AppState {
        let mut path = std::env::temp_dir();
        path.push(format!("tally_test_routes_{}.json", uuid::Uuid::new_v4()));
        let session = LedgerSession::open(Box::new(JsonStore::new(path)), dec!(1))
            .await
            .unwrap();
        Arc::new(DashboardState::new(session, "Test Ledger", "₹"))
    }

    #[tokio::test]
    async fn test_get_players_empty() {
        let state = test_state().await;
        let Json(players) = get_players(State(state)).await;
        assert!(players.is_empty());
    }

    #[tokio::test]
    async fn test_create_player_then_list() {
        let state = test_state().await;
        let (status, Json(player)) = create_player(
            State(state.clone()),
            Json(CreatePlayerRequest {
                name: "Rahul".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(player.name, "Rahul");

        let Json(players) = get_players(State(state)).await;
        assert_eq!(players.len(), 1);
    }

    #[tokio::test]
    async fn test_create_player_blank_name_422() {
        let state = test_state().await;
        let err = create_player(
            State(state),
            Json(CreatePlayerRequest { name: "  ".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_missing_player_404() {
        let state = test_state().await;
        let err = delete_player(State(state), Path("ghost".into()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_game_flow_and_trend_names() {
        let state = test_state().await;
        let (_, Json(a)) = create_player(
            State(state.clone()),
            Json(CreatePlayerRequest { name: "A".into() }),
        )
        .await
        .unwrap();
        let (_, Json(b)) = create_player(
            State(state.clone()),
            Json(CreatePlayerRequest { name: "B".into() }),
        )
        .await
        .unwrap();

        let (status, Json(game)) = create_game(
            State(state.clone()),
            Json(RecordGameRequest {
                entries: vec![
                    GameEntry {
                        player_id: a.id.clone(),
                        bets: "4".into(),
                    },
                    GameEntry {
                        player_id: b.id.clone(),
                        bets: "".into(),
                    },
                ],
                winner_id: a.id.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(game.pot_total, dec!(6));

        // Trend resolves ids to display names at this boundary.
        let Json(trend) = get_trend(State(state.clone())).await;
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0]["game"], 1);
        assert!((trend[0]["A"].as_f64().unwrap() - 1.0).abs() < 1e-9);
        assert!((trend[0]["B"].as_f64().unwrap() + 1.0).abs() < 1e-9);

        let Json(results) = get_game_results(State(state), Path(game.id.clone()))
            .await
            .unwrap();
        assert!(results[0].is_winner);
    }

    #[tokio::test]
    async fn test_create_game_too_few_422() {
        let state = test_state().await;
        let (_, Json(a)) = create_player(
            State(state.clone()),
            Json(CreatePlayerRequest { name: "A".into() }),
        )
        .await
        .unwrap();

        let err = create_game(
            State(state),
            Json(RecordGameRequest {
                entries: vec![GameEntry {
                    player_id: a.id.clone(),
                    bets: "1".into(),
                }],
                winner_id: a.id,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_summary_and_fee() {
        let state = test_state().await;
        let Json(summary) = get_summary(State(state.clone())).await;
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.default_fee, dec!(1));
        assert_eq!(summary.ledger, "Test Ledger");

        let status = set_fee(State(state.clone()), Json(FeeRequest { fee: dec!(5) })).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(summary) = get_summary(State(state)).await;
        assert_eq!(summary.default_fee, dec!(5));
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let state = test_state().await;
        let Json(stats) = get_stats(State(state)).await;
        assert!(stats.is_empty());
    }
}
