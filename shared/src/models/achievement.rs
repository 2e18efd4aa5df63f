use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Badge tier, lowest to highest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Bronze => write!(f, "Bronze"),
            Rarity::Silver => write!(f, "Silver"),
            Rarity::Gold => write!(f, "Gold"),
            Rarity::Platinum => write!(f, "Platinum"),
        }
    }
}

/// Achievement definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,

    pub rarity: Rarity,
}

/// A user's progress towards one achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub user_id: String,
    pub achievement: Achievement,
    pub progress: u32,
    pub max_progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<FixedOffset>>,
}

impl UserAchievement {
    /// Fraction complete in `[0, 1]`. Progress past the maximum is clamped;
    /// a zero maximum reads as no progress.
    pub fn progress_ratio(&self) -> f64 {
        if self.max_progress == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.max_progress as f64).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.unlocked_at.is_some() || (self.max_progress > 0 && self.progress >= self.max_progress)
    }
}

/// Aggregate view over a user's achievements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
    pub highest_rarity: Option<Rarity>,
}

pub fn summarize_achievements(achievements: &[UserAchievement]) -> AchievementSummary {
    let unlocked: Vec<&UserAchievement> = achievements.iter().filter(|a| a.is_complete()).collect();
    AchievementSummary {
        unlocked: unlocked.len(),
        total: achievements.len(),
        highest_rarity: unlocked.iter().map(|a| a.achievement.rarity).max(),
    }
}
