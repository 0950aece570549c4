use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use arcade_core::error::CommandError;
use arcade_core::game_trait::{CardId, GameStatus};
use arcade_core::scorecard::{CloseOutcome, OpenScorecard, Scorecard, ScorecardSnapshot};
use arcade_core::time::timestamp_now;

/// Owns every scorecard, each behind its own mutex.
#[derive(Default)]
pub struct ScorecardManager {
    cards: RwLock<HashMap<CardId, Arc<Mutex<Scorecard>>>>,
}

impl ScorecardManager {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lookup(&self, card_id: &str) -> Result<Arc<Mutex<Scorecard>>, CommandError> {
        self.cards
            .read()
            .await
            .get(card_id)
            .map(Arc::clone)
            .ok_or_else(|| CommandError::UnknownScorecard(card_id.to_string()))
    }

    pub async fn open(&self, meta: OpenScorecard) -> CardId {
        let card_id = uuid::Uuid::new_v4().to_string();
        let card = Scorecard::new(card_id.clone(), meta, timestamp_now());
        self.cards
            .write()
            .await
            .insert(card_id.clone(), Arc::new(Mutex::new(card)));
        tracing::info!(card_id = %card_id, "Scorecard opened");
        card_id
    }

    pub async fn record_start(&self, card_id: &str, game_id: &str) -> Result<(), CommandError> {
        let card = self.lookup(card_id).await?;
        card.lock().await.record_start(game_id)
    }

    pub async fn record_outcome(
        &self,
        card_id: &str,
        game_id: &str,
        final_score: u32,
        status: GameStatus,
        action_count: u64,
    ) -> Result<(), CommandError> {
        let card = self.lookup(card_id).await?;
        card.lock()
            .await
            .record_outcome(game_id, final_score, status, action_count)?;
        tracing::info!(
            card_id = %card_id,
            game_id = %game_id,
            score = final_score,
            status = %status,
            "Outcome recorded"
        );
        Ok(())
    }

    /// Close a card. Closing an already-closed card returns the frozen snapshot.
    pub async fn close(&self, card_id: &str) -> Result<CloseOutcome, CommandError> {
        let card = self.lookup(card_id).await?;
        let mut card = card.lock().await;
        if card.close(timestamp_now()) {
            tracing::info!(card_id = %card_id, "Scorecard closed");
            Ok(CloseOutcome::Closed(card.snapshot()))
        } else {
            tracing::debug!(card_id = %card_id, "Scorecard already closed");
            Ok(CloseOutcome::AlreadyClosed(card.snapshot()))
        }
    }

    /// Snapshot of a card, optionally narrowed to one game.
    pub async fn get(
        &self,
        card_id: &str,
        game_id: Option<&str>,
    ) -> Result<ScorecardSnapshot, CommandError> {
        let card = self.lookup(card_id).await?;
        let card = card.lock().await;
        Ok(match game_id {
            Some(game_id) => card.snapshot_for_game(game_id),
            None => card.snapshot(),
        })
    }

    pub async fn count(&self) -> usize {
        self.cards.read().await.len()
    }
}
