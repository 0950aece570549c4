use std::sync::Arc;

use arcade_core::action::{ActionInput, CommandKind};
use arcade_core::error::CommandError;
use arcade_core::game_registry::GameSummary;
use arcade_core::game_trait::CardId;
use arcade_core::messages::{CommandRequest, FrameResponse};
use arcade_core::scorecard::{CloseOutcome, OpenScorecard, ScorecardSnapshot};

use crate::game_registry::{GameRegistry, RegisteredGame};
use crate::instance_manager::{InstanceManager, InstanceSnapshot};
use crate::scorecard_manager::ScorecardManager;

/// Entry point for every core operation. The HTTP layer only parses requests
/// and maps errors; all state transitions go through here.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<GameRegistry>,
    instances: Arc<InstanceManager>,
    scorecards: Arc<ScorecardManager>,
}

impl CommandDispatcher {
    pub fn new(
        registry: Arc<GameRegistry>,
        instances: Arc<InstanceManager>,
        scorecards: Arc<ScorecardManager>,
    ) -> Self {
        Self {
            registry,
            instances,
            scorecards,
        }
    }

    pub fn list_games(&self) -> Vec<GameSummary> {
        self.registry.list()
    }

    pub async fn open_scorecard(&self, meta: OpenScorecard) -> CardId {
        self.scorecards.open(meta).await
    }

    pub async fn close_scorecard(&self, card_id: &str) -> Result<CloseOutcome, CommandError> {
        self.scorecards.close(card_id).await
    }

    pub async fn get_scorecard(
        &self,
        card_id: &str,
        game_id: Option<&str>,
    ) -> Result<ScorecardSnapshot, CommandError> {
        self.scorecards.get(card_id, game_id).await
    }

    /// Run one command against a game instance.
    ///
    /// Instance state is committed before the scorecard is touched; a
    /// scorecard failure is logged and reported in `scorecard_error` but does
    /// not undo the move.
    pub async fn dispatch(
        &self,
        kind: CommandKind,
        req: CommandRequest,
    ) -> Result<FrameResponse, CommandError> {
        let game = self
            .registry
            .get(&req.game_id)
            .ok_or_else(|| CommandError::UnknownGame(req.game_id.clone()))?;

        let (snapshot, action) = match kind {
            CommandKind::Reset => {
                let snapshot = self
                    .instances
                    .create_or_reset(&game, req.guid.as_deref(), req.card_id.clone())
                    .await?;
                (snapshot, None)
            },
            _ => {
                let instance_id = req.guid.as_deref().ok_or_else(|| {
                    CommandError::UnknownInstance(format!("{kind} requires a guid"))
                })?;
                let outcome = self
                    .instances
                    .apply_action(instance_id, &game, kind, req.x, req.y)
                    .await?;
                (outcome.snapshot, Some(outcome.action))
            },
        };

        let scorecard_error = match req.card_id.as_deref() {
            Some(card_id) => self
                .record_on_card(card_id, kind, &snapshot)
                .await
                .err()
                .map(|e| {
                    tracing::warn!(
                        card_id = %card_id,
                        instance_id = %snapshot.instance_id,
                        error = %e,
                        "Scorecard update failed"
                    );
                    e.to_string()
                }),
            None => None,
        };

        Ok(frame_response(
            &game,
            snapshot,
            ActionInput::new(kind, action.as_ref(), req.reasoning.as_ref()),
            scorecard_error,
        ))
    }

    async fn record_on_card(
        &self,
        card_id: &str,
        kind: CommandKind,
        snapshot: &InstanceSnapshot,
    ) -> Result<(), CommandError> {
        if kind == CommandKind::Reset {
            self.scorecards
                .record_start(card_id, &snapshot.game_id)
                .await?;
        }
        if snapshot.status.is_terminal() {
            self.scorecards
                .record_outcome(
                    card_id,
                    &snapshot.game_id,
                    snapshot.score,
                    snapshot.status,
                    snapshot.action_count,
                )
                .await?;
        }
        Ok(())
    }
}

fn frame_response(
    game: &RegisteredGame,
    snapshot: InstanceSnapshot,
    action_input: ActionInput,
    scorecard_error: Option<String>,
) -> FrameResponse {
    FrameResponse {
        game_id: snapshot.game_id,
        instance_id: snapshot.instance_id,
        frame: snapshot.frame,
        status: snapshot.status,
        score: snapshot.score,
        win_score: game.info.win_score,
        action_count: snapshot.action_count,
        action_input,
        scorecard_error,
    }
}
