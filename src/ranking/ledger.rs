use tracing::{info, warn};

use super::store::{RankingError, RankingStore, Scores};

/// Why a submitted score was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Zero or negative points
    NotPositive,
    /// Not above the player's stored best
    NotAnImprovement { best: i64 },
}

/// Result of [`RankingLedger::record_score`]
#[derive(Debug)]
pub struct ScoreOutcome {
    /// The score became the player's new best
    pub accepted: bool,
    /// The new best beats every other player's best
    pub is_highscore: bool,
    pub rejection: Option<Rejection>,
    /// Set when the in-memory update could not be written to the store
    pub save_error: Option<RankingError>,
}

impl ScoreOutcome {
    fn rejected(rejection: Rejection) -> Self {
        Self {
            accepted: false,
            is_highscore: false,
            rejection: Some(rejection),
            save_error: None,
        }
    }
}

/// Best score per player, backed by a [`RankingStore`]
pub struct RankingLedger {
    scores: Scores,
    store: Box<dyn RankingStore>,
}

impl RankingLedger {
    /// Load the ranking from `store`. Unreadable data starts an empty ranking.
    pub fn load(store: Box<dyn RankingStore>) -> Self {
        let scores = store.load().unwrap_or_else(|err| {
            warn!(%err, "could not load ranking, starting empty");
            Scores::new()
        });
        info!(players = scores.len(), "ranking loaded");

        Self { scores, store }
    }

    /// Submit `points` for `player`.
    ///
    /// Only strictly better, positive scores are stored. Accepted scores are
    /// saved right away; a failed save is reported in the outcome while the
    /// in-memory ranking keeps the new value.
    pub fn record_score(&mut self, player: &str, points: i64) -> ScoreOutcome {
        if points <= 0 {
            return ScoreOutcome::rejected(Rejection::NotPositive);
        }

        if let Some(&best) = self.scores.get(player) {
            if points <= best {
                return ScoreOutcome::rejected(Rejection::NotAnImprovement { best });
            }
        }

        let is_highscore = self
            .scores
            .iter()
            .filter(|(name, _)| name.as_str() != player)
            .all(|(_, &best)| points > best);

        self.scores.insert(player.to_string(), points);

        let save_error = self.store.save(&self.scores).err();
        if let Some(err) = &save_error {
            warn!(%err, player, points, "failed to save ranking");
        }

        ScoreOutcome {
            accepted: true,
            is_highscore,
            rejection: None,
            save_error,
        }
    }

    pub fn best(&self, player: &str) -> Option<i64> {
        self.scores.get(player).copied()
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }
}
