use crate::config::LeaderboardConfig;
use crate::leaderboard::repository::ParticipationRepository;
use log::debug;
use shared::{rank_participants, LeaderboardDto, Result};

pub struct LeaderboardService<R: ParticipationRepository> {
    pub repo: R,
    pub config: LeaderboardConfig,
}

impl<R: ParticipationRepository> LeaderboardService<R> {
    pub fn new(repo: R, config: LeaderboardConfig) -> Self {
        Self { repo, config }
    }

    /// Ranks a contest's participants under the configured policy.
    /// `total_entries` counts everyone, even when `limit` cuts the list.
    pub async fn leaderboard(&self, contest_id: &str) -> Result<LeaderboardDto> {
        let records = self.repo.participations(contest_id).await?;
        let mut entries = rank_participants(&records, self.config.ranking);
        let total_entries = entries.len();
        if let Some(limit) = self.config.limit {
            entries.truncate(limit);
        }
        debug!(
            "Leaderboard for {}: {} of {} entries ({:?})",
            contest_id,
            entries.len(),
            total_entries,
            self.config.ranking
        );

        Ok(LeaderboardDto {
            contest_id: contest_id.to_string(),
            policy: self.config.ranking,
            entries,
            total_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::repository::{InMemoryParticipationRepository, MockParticipationRepository};
    use pretty_assertions::assert_eq;
    use shared::{RankingPolicy, SharedError};

    async fn seeded() -> InMemoryParticipationRepository {
        let repo = InMemoryParticipationRepository::new();
        repo.record_score("c1", "alice", 40.0).await.unwrap();
        repo.record_score("c1", "bob", 90.0).await.unwrap();
        repo.record_score("c1", "carol", 40.0).await.unwrap();
        repo.record_score("c1", "dave", 70.0).await.unwrap();
        repo
    }

    fn users(board: &LeaderboardDto) -> Vec<&str> {
        board.entries.iter().map(|e| e.user_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_ranked_by_score() {
        let service = LeaderboardService::new(seeded().await, LeaderboardConfig::default());
        let board = service.leaderboard("c1").await.unwrap();
        assert_eq!(users(&board), vec!["bob", "dave", "alice", "carol"]);
        assert_eq!(board.entries[3].rank, 4);
        assert_eq!(board.total_entries, 4);
        assert_eq!(board.policy, RankingPolicy::ByScore);
    }

    #[tokio::test]
    async fn test_arrival_order_with_limit() {
        let service = LeaderboardService::new(
            seeded().await,
            LeaderboardConfig {
                ranking: RankingPolicy::ArrivalOrder,
                limit: Some(2),
            },
        );
        let board = service.leaderboard("c1").await.unwrap();
        assert_eq!(users(&board), vec!["alice", "bob"]);
        assert_eq!(board.total_entries, 4);
    }

    #[tokio::test]
    async fn test_repository_error_propagates() {
        let mut repo = MockParticipationRepository::new();
        repo.expect_participations()
            .returning(|_| Err(SharedError::Database("timeout".to_string())));

        let service = LeaderboardService::new(repo, LeaderboardConfig::default());
        let result = service.leaderboard("c1").await;
        assert_eq!(result, Err(SharedError::Database("timeout".to_string())));
    }
}
