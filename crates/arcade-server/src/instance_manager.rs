use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use arcade_core::action::{CommandKind, GameAction};
use arcade_core::error::{CommandError, GameLogicError};
use arcade_core::frame::Frame;
use arcade_core::game_trait::{CardId, GameId, GameStatus, InstanceId, Transition};

use crate::game_registry::RegisteredGame;

/// Mutable state of one running game.
struct GameInstance {
    instance_id: InstanceId,
    game_id: GameId,
    state: Vec<u8>,
    frame: Frame,
    score: u32,
    status: GameStatus,
    action_count: u64,
    plays: u64,
    card_id: Option<CardId>,
}

impl GameInstance {
    fn start(&mut self, t: Transition, card_id: Option<CardId>) {
        self.state = t.state;
        self.frame = t.frame;
        self.score = t.score;
        self.status = in_play(t.status);
        self.action_count = 0;
        self.plays += 1;
        self.card_id = card_id;
    }

    fn commit(&mut self, t: Transition) {
        self.state = t.state;
        self.frame = t.frame;
        self.score = t.score;
        self.status = in_play(t.status);
        self.action_count += 1;
    }

    fn snapshot(&self) -> InstanceSnapshot {
        InstanceSnapshot {
            instance_id: self.instance_id.clone(),
            game_id: self.game_id.clone(),
            frame: self.frame.clone(),
            score: self.score,
            status: self.status,
            action_count: self.action_count,
            plays: self.plays,
            card_id: self.card_id.clone(),
        }
    }
}

/// A game may report NOT_STARTED from init; once RESET it is in play.
fn in_play(status: GameStatus) -> GameStatus {
    match status {
        GameStatus::NotStarted => GameStatus::InProgress,
        other => other,
    }
}

/// Read-only copy of an instance taken while its lock was held.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSnapshot {
    pub instance_id: InstanceId,
    pub game_id: GameId,
    pub frame: Frame,
    pub score: u32,
    pub status: GameStatus,
    pub action_count: u64,
    /// Number of RESETs applied to this instance.
    pub plays: u64,
    /// Card named on the most recent RESET.
    pub card_id: Option<CardId>,
}

/// Result of an accepted ACTION command.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub snapshot: InstanceSnapshot,
    pub action: GameAction,
}

/// Owns every game instance. The table lock is only held to find or insert an
/// entry; each instance has its own mutex, held across its game logic call so
/// commands against one instance apply in arrival order.
pub struct InstanceManager {
    instances: RwLock<HashMap<InstanceId, Arc<Mutex<GameInstance>>>>,
    logic_timeout: Duration,
}

impl InstanceManager {
    pub fn new(logic_timeout: Duration) -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            logic_timeout,
        }
    }

    async fn lookup(&self, instance_id: &str) -> Option<Arc<Mutex<GameInstance>>> {
        self.instances.read().await.get(instance_id).map(Arc::clone)
    }

    /// Run game logic off the async runtime, bounded by the logic timeout.
    async fn run_logic<F>(&self, f: F) -> Result<Transition, CommandError>
    where
        F: FnOnce() -> Result<Transition, GameLogicError> + Send + 'static,
    {
        match tokio::time::timeout(self.logic_timeout, tokio::task::spawn_blocking(f)).await {
            Err(_) => Err(CommandError::GameLogicTimeout(
                self.logic_timeout.as_millis() as u64,
            )),
            Ok(Err(join_err)) => Err(GameLogicError::Aborted(join_err.to_string()).into()),
            Ok(Ok(result)) => result.map_err(CommandError::from),
        }
    }

    /// RESET: reinitialize a known instance in place, or create a fresh one.
    ///
    /// An `existing_id` that is not known mints a new id rather than failing.
    pub async fn create_or_reset(
        &self,
        game: &RegisteredGame,
        existing_id: Option<&str>,
        card_id: Option<CardId>,
    ) -> Result<InstanceSnapshot, CommandError> {
        if let Some(id) = existing_id
            && let Some(entry) = self.lookup(id).await
        {
            let mut instance = entry.lock().await;
            if instance.game_id != game.info.game_id {
                return Err(CommandError::GameMismatch {
                    instance_id: id.to_string(),
                    actual: instance.game_id.clone(),
                    requested: game.info.game_id.clone(),
                });
            }
            let logic = Arc::clone(&game.logic);
            let t = self.run_logic(move || logic.init()).await?;
            instance.start(t, card_id);
            tracing::info!(
                instance_id = %id,
                game_id = %instance.game_id,
                plays = instance.plays,
                "Instance reset"
            );
            return Ok(instance.snapshot());
        }

        if let Some(id) = existing_id {
            tracing::debug!(instance_id = %id, "RESET named an unknown guid, minting a new one");
        }

        let logic = Arc::clone(&game.logic);
        let t = self.run_logic(move || logic.init()).await?;
        let instance_id = uuid::Uuid::new_v4().to_string();
        let mut instance = GameInstance {
            instance_id: instance_id.clone(),
            game_id: game.info.game_id.clone(),
            state: Vec::new(),
            frame: Frame::default(),
            score: 0,
            status: GameStatus::NotStarted,
            action_count: 0,
            plays: 0,
            card_id: None,
        };
        instance.start(t, card_id);
        let snapshot = instance.snapshot();

        self.instances
            .write()
            .await
            .insert(instance_id.clone(), Arc::new(Mutex::new(instance)));
        tracing::info!(instance_id = %instance_id, game_id = %game.info.game_id, "Instance created");
        Ok(snapshot)
    }

    pub async fn get(&self, instance_id: &str) -> Result<InstanceSnapshot, CommandError> {
        let entry = self
            .lookup(instance_id)
            .await
            .ok_or_else(|| CommandError::UnknownInstance(instance_id.to_string()))?;
        let instance = entry.lock().await;
        Ok(instance.snapshot())
    }

    /// Apply ACTION1..ACTION6 to a live instance.
    ///
    /// Checks run in order: unknown id, wrong game, invalid action payload,
    /// terminal status. Nothing is committed unless game logic succeeds.
    pub async fn apply_action(
        &self,
        instance_id: &str,
        game: &RegisteredGame,
        kind: CommandKind,
        x: Option<i64>,
        y: Option<i64>,
    ) -> Result<ActionOutcome, CommandError> {
        let entry = self
            .lookup(instance_id)
            .await
            .ok_or_else(|| CommandError::UnknownInstance(instance_id.to_string()))?;
        let mut instance = entry.lock().await;

        if instance.game_id != game.info.game_id {
            return Err(CommandError::GameMismatch {
                instance_id: instance_id.to_string(),
                actual: instance.game_id.clone(),
                requested: game.info.game_id.clone(),
            });
        }
        let action = kind
            .to_action(x, y, game.info.grid)?
            .ok_or_else(|| CommandError::InvalidAction("RESET is not an action".to_string()))?;
        if instance.status.is_terminal() {
            return Err(CommandError::InstanceTerminal {
                instance_id: instance_id.to_string(),
                status: instance.status,
            });
        }

        let logic = Arc::clone(&game.logic);
        let state = instance.state.clone();
        let t = self.run_logic(move || logic.apply(&state, &action)).await?;
        instance.commit(t);

        tracing::debug!(
            instance_id = %instance_id,
            action = %kind,
            action_count = instance.action_count,
            score = instance.score,
            status = %instance.status,
            "Action applied"
        );
        Ok(ActionOutcome {
            snapshot: instance.snapshot(),
            action,
        })
    }

    pub async fn count(&self) -> usize {
        self.instances.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::action::GameAction;
    use arcade_core::game_trait::{GameInfo, GameLogic, GridSize};
    use arcade_core::test_helpers::{SCRIPTED_WIN_SCORE, ScriptedGame};

    fn scripted(game_id: &str) -> RegisteredGame {
        let logic: Arc<dyn GameLogic> = Arc::new(ScriptedGame::new(game_id));
        RegisteredGame {
            info: logic.info(),
            logic,
        }
    }

    fn manager() -> InstanceManager {
        InstanceManager::new(Duration::from_secs(2))
    }

    /// Sleeps in `apply` longer than any test timeout.
    struct SlowGame;

    impl GameLogic for SlowGame {
        fn info(&self) -> GameInfo {
            GameInfo {
                game_id: "slow".to_string(),
                title: "Slow".to_string(),
                grid: GridSize::square(64),
                win_score: 1,
            }
        }

        fn init(&self) -> Result<Transition, GameLogicError> {
            ScriptedGame::new("slow").init()
        }

        fn apply(&self, state: &[u8], action: &GameAction) -> Result<Transition, GameLogicError> {
            std::thread::sleep(Duration::from_millis(300));
            ScriptedGame::new("slow").apply(state, action)
        }
    }

    /// Panics in `apply`.
    struct PanicGame;

    impl GameLogic for PanicGame {
        fn info(&self) -> GameInfo {
            GameInfo {
                game_id: "panic".to_string(),
                title: "Panic".to_string(),
                grid: GridSize::square(64),
                win_score: 1,
            }
        }

        fn init(&self) -> Result<Transition, GameLogicError> {
            ScriptedGame::new("panic").init()
        }

        fn apply(&self, _state: &[u8], _action: &GameAction) -> Result<Transition, GameLogicError> {
            panic!("game logic bug")
        }
    }

    #[tokio::test]
    async fn reset_creates_in_progress_instance() {
        let mgr = manager();
        let snap = mgr.create_or_reset(&scripted("g1"), None, None).await.unwrap();
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.action_count, 0);
        assert_eq!(snap.plays, 1);
        assert!(uuid::Uuid::parse_str(&snap.instance_id).is_ok());
        assert_eq!(mgr.count().await, 1);
    }

    #[tokio::test]
    async fn actions_increment_count_by_one() {
        let mgr = manager();
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        for n in 1..=5 {
            let out = mgr
                .apply_action(&id, &game, CommandKind::Action1, None, None)
                .await
                .unwrap();
            assert_eq!(out.snapshot.action_count, n);
            assert_eq!(out.snapshot.score, n as u32);
        }
    }

    #[tokio::test]
    async fn reset_known_id_reuses_it_and_restarts() {
        let mgr = manager();
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        mgr.apply_action(&id, &game, CommandKind::Action2, None, None)
            .await
            .unwrap();

        let snap = mgr
            .create_or_reset(&game, Some(&id), Some("card".to_string()))
            .await
            .unwrap();
        assert_eq!(snap.instance_id, id);
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.action_count, 0);
        assert_eq!(snap.plays, 2);
        assert_eq!(snap.card_id.as_deref(), Some("card"));
        assert_eq!(mgr.count().await, 1);
    }

    #[tokio::test]
    async fn reset_unknown_id_mints_fresh_one() {
        let mgr = manager();
        let snap = mgr
            .create_or_reset(&scripted("g1"), Some("nonexistent-123"), None)
            .await
            .unwrap();
        assert_ne!(snap.instance_id, "nonexistent-123");
    }

    #[tokio::test]
    async fn reset_under_other_game_is_mismatch() {
        let mgr = manager();
        let id = mgr
            .create_or_reset(&scripted("g1"), None, None)
            .await
            .unwrap()
            .instance_id;
        let err = mgr
            .create_or_reset(&scripted("g2"), Some(&id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::GameMismatch { .. }));
    }

    #[tokio::test]
    async fn terminal_instance_rejects_actions_unchanged() {
        let mgr = manager();
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        let won = mgr
            .apply_action(&id, &game, CommandKind::Action2, None, None)
            .await
            .unwrap()
            .snapshot;
        assert_eq!(won.status, GameStatus::Win);
        assert_eq!(won.score, SCRIPTED_WIN_SCORE);

        for kind in [CommandKind::Action1, CommandKind::Action6] {
            let err = mgr
                .apply_action(&id, &game, kind, Some(1), Some(1))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                CommandError::InstanceTerminal {
                    status: GameStatus::Win,
                    ..
                }
            ));
        }
        assert_eq!(mgr.get(&id).await.unwrap(), won);
    }

    #[tokio::test]
    async fn bad_click_on_won_instance_is_invalid_action() {
        let mgr = manager();
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        let won = mgr
            .apply_action(&id, &game, CommandKind::Action2, None, None)
            .await
            .unwrap()
            .snapshot;
        assert_eq!(won.status, GameStatus::Win);

        let err = mgr
            .apply_action(&id, &game, CommandKind::Action6, Some(-1), Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidAction(_)));
        assert_eq!(mgr.get(&id).await.unwrap(), won);
    }

    #[tokio::test]
    async fn invalid_click_is_rejected_without_mutation() {
        let mgr = manager();
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        let before = mgr.get(&id).await.unwrap();

        for (x, y) in [(Some(-1), Some(0)), (Some(0), None), (Some(64), Some(3))] {
            let err = mgr
                .apply_action(&id, &game, CommandKind::Action6, x, y)
                .await
                .unwrap_err();
            assert!(matches!(err, CommandError::InvalidAction(_)));
        }
        assert_eq!(mgr.get(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_instance_is_reported() {
        let mgr = manager();
        let err = mgr
            .apply_action("nonexistent-123", &scripted("g1"), CommandKind::Action1, None, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownInstance("nonexistent-123".to_string())
        );
        assert!(matches!(
            mgr.get("nonexistent-123").await,
            Err(CommandError::UnknownInstance(_))
        ));
    }

    #[tokio::test]
    async fn slow_logic_times_out_and_commits_nothing() {
        let mgr = InstanceManager::new(Duration::from_millis(50));
        let logic: Arc<dyn GameLogic> = Arc::new(SlowGame);
        let game = RegisteredGame {
            info: logic.info(),
            logic,
        };
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        let err = mgr
            .apply_action(&id, &game, CommandKind::Action1, None, None)
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::GameLogicTimeout(50));
        let snap = mgr.get(&id).await.unwrap();
        assert_eq!(snap.action_count, 0);
        assert_eq!(snap.score, 0);
    }

    #[tokio::test]
    async fn panicking_logic_is_contained() {
        let mgr = manager();
        let logic: Arc<dyn GameLogic> = Arc::new(PanicGame);
        let game = RegisteredGame {
            info: logic.info(),
            logic,
        };
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;
        let err = mgr
            .apply_action(&id, &game, CommandKind::Action1, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::GameLogic(GameLogicError::Aborted(_))
        ));
        assert_eq!(mgr.get(&id).await.unwrap().status, GameStatus::InProgress);
    }

    #[tokio::test]
    async fn concurrent_actions_on_one_instance_are_serialized() {
        let mgr = Arc::new(manager());
        let game = scripted("g1");
        let id = mgr.create_or_reset(&game, None, None).await.unwrap().instance_id;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let mgr = Arc::clone(&mgr);
            let game = game.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                mgr.apply_action(&id, &game, CommandKind::Action1, None, None)
                    .await
                    .unwrap()
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let snap = mgr.get(&id).await.unwrap();
        assert_eq!(snap.action_count, 20);
        assert_eq!(snap.score, 20);
    }
}
