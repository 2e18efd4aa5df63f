use crate::models::contest::ContestPhase;
use crate::models::leaderboard::{LeaderboardEntry, RankingPolicy};
use serde::{Deserialize, Serialize};

/// The one affordance the join control presents at a time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContestAction {
    /// Contest is over; disabled
    Ended,
    /// User is already in; disabled
    Joined,
    /// Contest is running and the user may try to join
    Join,
    /// Contest has not started yet
    Remind,
    /// Nothing applies, or a join is in flight
    Disabled,
}

impl ContestAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContestAction::Ended => "Contest Ended",
            ContestAction::Joined => "Joined",
            ContestAction::Join => "Join Contest",
            ContestAction::Remind => "Set Reminder",
            ContestAction::Disabled => "Unavailable",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ContestAction::Join | ContestAction::Remind)
    }
}

/// Snapshot of the join control for rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContestStatusDto {
    pub contest_id: String,
    pub phase: ContestPhase,
    pub action: ContestAction,
    pub label: String,
    pub enabled: bool,
    pub participant_count: usize,
    pub remaining_slots: Option<u32>,
    pub has_joined: bool,
    pub is_busy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardDto {
    pub contest_id: String,
    pub policy: RankingPolicy,
    pub entries: Vec<LeaderboardEntry>,
    pub total_entries: usize,
}
