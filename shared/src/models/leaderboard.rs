use serde::{Deserialize, Serialize};

/// One user's standing in a contest, as recorded by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub user_id: String,
    pub score: f64,
}

/// Ranked row; rank is derived on every read and never persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub score: f64,
}

/// How ranks are assigned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Descending score; equal scores keep arrival order
    #[default]
    ByScore,
    /// Records ranked in the order they arrived
    ArrivalOrder,
}

impl std::str::FromStr for RankingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "score" | "by_score" => Ok(RankingPolicy::ByScore),
            "arrival" | "arrival_order" => Ok(RankingPolicy::ArrivalOrder),
            _ => Err(format!("Unknown ranking policy: {}", s)),
        }
    }
}

/// Assigns `rank = position + 1` under the given policy. Ties get distinct
/// consecutive ranks.
pub fn rank_participants(records: &[Participation], policy: RankingPolicy) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&Participation> = records.iter().collect();
    if policy == RankingPolicy::ByScore {
        // sort_by is stable, so arrival order breaks ties
        ordered.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i as u32 + 1,
            user_id: p.user_id.clone(),
            score: p.score,
        })
        .collect()
}
