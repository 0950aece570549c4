use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use arcade_core::action::CommandKind;
use arcade_core::game_registry::GameSummary;
use arcade_core::messages::{CommandRequest, FrameResponse};
use arcade_core::scorecard::{OpenScorecard, ScorecardSnapshot};

use crate::config::LimitsConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Response for a newly opened scorecard.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenScorecardResponse {
    pub card_id: String,
}

/// Request body for closing a scorecard.
#[derive(Debug, Deserialize)]
pub struct CloseScorecardBody {
    pub card_id: String,
}

/// Validate scorecard metadata sizes to prevent abuse.
fn validate_open_fields(meta: &OpenScorecard, limits: &LimitsConfig) -> Result<(), AppError> {
    if let Some(ref url) = meta.source_url
        && url.len() > limits.max_url_len
    {
        return Err(AppError::BadRequest(format!(
            "source_url exceeds {} chars",
            limits.max_url_len
        )));
    }
    if meta.tags.len() > limits.max_tags {
        return Err(AppError::BadRequest(format!(
            "tags exceed {} entries",
            limits.max_tags
        )));
    }
    if meta.tags.iter().any(|t| t.len() > limits.max_tag_len) {
        return Err(AppError::BadRequest(format!(
            "tag exceeds {} chars",
            limits.max_tag_len
        )));
    }
    Ok(())
}

/// GET /api/games: list registered games.
pub async fn list_games(State(state): State<AppState>) -> Json<Vec<GameSummary>> {
    Json(state.dispatcher.list_games())
}

/// POST /api/scorecard/open: start a new scorecard.
pub async fn open_scorecard(
    State(state): State<AppState>,
    Json(meta): Json<OpenScorecard>,
) -> Result<Json<OpenScorecardResponse>, AppError> {
    validate_open_fields(&meta, &state.config.limits)?;
    let card_id = state.dispatcher.open_scorecard(meta).await;
    Ok(Json(OpenScorecardResponse { card_id }))
}

/// POST /api/scorecard/close: freeze a scorecard and return its totals.
pub async fn close_scorecard(
    State(state): State<AppState>,
    Json(body): Json<CloseScorecardBody>,
) -> Result<Json<ScorecardSnapshot>, AppError> {
    let outcome = state.dispatcher.close_scorecard(&body.card_id).await?;
    Ok(Json(outcome.into_snapshot()))
}

/// GET /api/scorecard/{card_id}
pub async fn get_scorecard(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<ScorecardSnapshot>, AppError> {
    Ok(Json(state.dispatcher.get_scorecard(&card_id, None).await?))
}

/// GET /api/scorecard/{card_id}/{game_id}
pub async fn get_scorecard_for_game(
    State(state): State<AppState>,
    Path((card_id, game_id)): Path<(String, String)>,
) -> Result<Json<ScorecardSnapshot>, AppError> {
    Ok(Json(
        state
            .dispatcher
            .get_scorecard(&card_id, Some(&game_id))
            .await?,
    ))
}

/// POST /api/cmd/{command}: RESET or ACTION1..ACTION6.
pub async fn command(
    State(state): State<AppState>,
    Path(command): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<FrameResponse>, AppError> {
    let kind: CommandKind = command.parse()?;
    tracing::debug!(
        command = %kind,
        game_id = %req.game_id,
        guid = ?req.guid,
        "Command received"
    );
    Ok(Json(state.dispatcher.dispatch(kind, req).await?))
}
