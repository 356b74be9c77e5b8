//! Score table: latest score per player, shared by ingest and broadcast.

use std::collections::BTreeMap;

use lanes_common::PlayerId;
use tokio::sync::RwLock;

/// Immutable copy of the table taken under the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSnapshot {
    /// Bumped on every write; lets a channel skip snapshots older than the
    /// one it already sent.
    pub revision: u64,
    pub scores: BTreeMap<PlayerId, String>,
}

impl ScoreSnapshot {
    pub fn get(&self, player: PlayerId) -> &str {
        self.scores.get(&player).map(String::as_str).unwrap_or("0")
    }

    /// Wire form pushed to channels, e.g. `{"player_1":"7","player_2":"0"}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.scores).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize score snapshot");
            "{}".to_string()
        })
    }
}

struct TableState {
    revision: u64,
    scores: BTreeMap<PlayerId, String>,
}

/// Thread-safe table holding exactly one entry per [`PlayerId`].
pub struct ScoreTable {
    state: RwLock<TableState>,
}

impl ScoreTable {
    /// Every known player starts at `"0"`.
    pub fn new() -> Self {
        let scores = PlayerId::ALL
            .into_iter()
            .map(|p| (p, "0".to_string()))
            .collect();
        Self {
            state: RwLock::new(TableState {
                revision: 0,
                scores,
            }),
        }
    }

    pub async fn snapshot(&self) -> ScoreSnapshot {
        let state = self.state.read().await;
        ScoreSnapshot {
            revision: state.revision,
            scores: state.scores.clone(),
        }
    }

    /// Overwrite one player's score. Returns the new revision.
    pub async fn set(&self, player: PlayerId, score: impl Into<String>) -> u64 {
        let mut state = self.state.write().await;
        state.scores.insert(player, score.into());
        state.revision += 1;
        state.revision
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}
