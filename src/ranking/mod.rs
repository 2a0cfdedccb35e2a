//! Per-player best scores with highscore detection

pub mod ledger;
pub mod store;

pub use ledger::{RankingLedger, Rejection, ScoreOutcome};
pub use store::{
    JsonFileStore, MemoryStore, RankingError, RankingStore, Scores, current_player,
    default_ranking_path,
};
