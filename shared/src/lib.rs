pub mod models {
    pub mod achievement;
    pub mod contest;
    pub mod leaderboard;
}

pub mod dto {
    pub mod contest;
}

pub mod error;

// Re-export commonly used items
pub use error::{Result, SharedError};

// Re-export models
pub use models::{
    achievement::{summarize_achievements, Achievement, AchievementSummary, Rarity, UserAchievement},
    contest::{Contest, ContestPhase},
    leaderboard::{rank_participants, LeaderboardEntry, Participation, RankingPolicy},
};

// Re-export DTOs
pub use dto::contest::{ContestAction, ContestStatusDto, LeaderboardDto};
