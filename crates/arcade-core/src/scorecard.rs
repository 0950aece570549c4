use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::game_trait::{CardId, GameId, GameStatus};

/// Client-supplied metadata when opening a scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenScorecard {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub opaque: Option<serde_json::Value>,
}

/// Running aggregate for one game under one scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    pub game_id: GameId,
    /// RESETs issued against this card for the game.
    pub started: u64,
    /// Plays that reached a terminal status.
    #[serde(rename = "total_plays", alias = "plays")]
    pub plays: u64,
    pub total_score: u64,
    pub wins: u64,
    pub total_actions: u64,
    /// Final score of each finished play, in order.
    pub scores: Vec<u32>,
    pub states: Vec<GameStatus>,
    pub actions: Vec<u64>,
}

impl GameEntry {
    pub fn new(game_id: impl Into<GameId>) -> Self {
        Self {
            game_id: game_id.into(),
            started: 0,
            plays: 0,
            total_score: 0,
            wins: 0,
            total_actions: 0,
            scores: Vec::new(),
            states: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn record_outcome(&mut self, final_score: u32, status: GameStatus, action_count: u64) {
        self.plays += 1;
        self.total_score += u64::from(final_score);
        if status == GameStatus::Win {
            self.wins += 1;
        }
        self.total_actions += action_count;
        self.scores.push(final_score);
        self.states.push(status);
        self.actions.push(action_count);
    }
}

/// Mutable aggregation record for one open/close lifecycle.
#[derive(Debug, Clone)]
pub struct Scorecard {
    pub card_id: CardId,
    pub meta: OpenScorecard,
    pub open: bool,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub entries: BTreeMap<GameId, GameEntry>,
}

impl Scorecard {
    pub fn new(card_id: CardId, meta: OpenScorecard, opened_at: String) -> Self {
        Self {
            card_id,
            meta,
            open: true,
            opened_at,
            closed_at: None,
            entries: BTreeMap::new(),
        }
    }

    fn ensure_open(&self) -> Result<(), CommandError> {
        if self.open {
            Ok(())
        } else {
            Err(CommandError::ScorecardClosed(self.card_id.clone()))
        }
    }

    fn entry_mut(&mut self, game_id: &str) -> &mut GameEntry {
        self.entries
            .entry(game_id.to_string())
            .or_insert_with(|| GameEntry::new(game_id))
    }

    /// Count a RESET of `game_id` against this card.
    pub fn record_start(&mut self, game_id: &str) -> Result<(), CommandError> {
        self.ensure_open()?;
        self.entry_mut(game_id).started += 1;
        Ok(())
    }

    /// Fold a finished play into the aggregates. Rejected once closed.
    pub fn record_outcome(
        &mut self,
        game_id: &str,
        final_score: u32,
        status: GameStatus,
        action_count: u64,
    ) -> Result<(), CommandError> {
        self.ensure_open()?;
        self.entry_mut(game_id)
            .record_outcome(final_score, status, action_count);
        Ok(())
    }

    /// Freeze the card. Returns false if it was already closed.
    pub fn close(&mut self, closed_at: String) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.closed_at = Some(closed_at);
        true
    }

    /// Full view over every game played under this card.
    pub fn snapshot(&self) -> ScorecardSnapshot {
        self.build_snapshot(self.entries.clone())
    }

    /// View restricted to one game; a never-played game yields a zeroed entry.
    pub fn snapshot_for_game(&self, game_id: &str) -> ScorecardSnapshot {
        let entry = self
            .entries
            .get(game_id)
            .cloned()
            .unwrap_or_else(|| GameEntry::new(game_id));
        let mut cards = BTreeMap::new();
        cards.insert(game_id.to_string(), entry);
        self.build_snapshot(cards)
    }

    fn build_snapshot(&self, cards: BTreeMap<GameId, GameEntry>) -> ScorecardSnapshot {
        let won = cards.values().map(|e| e.wins).sum();
        let played = cards.values().map(|e| e.plays).sum();
        let total_actions = cards.values().map(|e| e.total_actions).sum();
        let score = cards.values().map(|e| e.total_score).sum();
        ScorecardSnapshot {
            card_id: self.card_id.clone(),
            open: self.open,
            won,
            played,
            total_actions,
            score,
            source_url: self.meta.source_url.clone(),
            tags: self.meta.tags.clone(),
            opaque: self.meta.opaque.clone(),
            opened_at: self.opened_at.clone(),
            closed_at: self.closed_at.clone(),
            cards,
        }
    }
}

/// Read-only view of a scorecard returned by get/close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardSnapshot {
    pub card_id: CardId,
    pub open: bool,
    pub won: u64,
    pub played: u64,
    pub total_actions: u64,
    pub score: u64,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub opaque: Option<serde_json::Value>,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub cards: BTreeMap<GameId, GameEntry>,
}

/// Result of closing a card. Closing twice is not an error: the second call
/// returns the snapshot frozen by the first.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    Closed(ScorecardSnapshot),
    AlreadyClosed(ScorecardSnapshot),
}

impl CloseOutcome {
    pub fn snapshot(&self) -> &ScorecardSnapshot {
        match self {
            Self::Closed(s) | Self::AlreadyClosed(s) => s,
        }
    }

    pub fn into_snapshot(self) -> ScorecardSnapshot {
        match self {
            Self::Closed(s) | Self::AlreadyClosed(s) => s,
        }
    }
}
