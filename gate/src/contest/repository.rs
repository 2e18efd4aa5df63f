use async_trait::async_trait;
use log::{debug, info, warn};
use shared::{Contest, Result, SharedError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistence seam for contests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestRepository: Send + Sync {
    async fn create(&self, contest: Contest) -> Result<Contest>;
    async fn find_by_id(&self, id: &str) -> Option<Contest>;
    async fn find_all(&self) -> Vec<Contest>;
    /// Appends `user_id` to the contest's participant list.
    async fn join_contest(&self, contest_id: &str, user_id: &str) -> Result<()>;
}

#[async_trait]
impl<T: ContestRepository + ?Sized> ContestRepository for Arc<T> {
    async fn create(&self, contest: Contest) -> Result<Contest> {
        (**self).create(contest).await
    }

    async fn find_by_id(&self, id: &str) -> Option<Contest> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Vec<Contest> {
        (**self).find_all().await
    }

    async fn join_contest(&self, contest_id: &str, user_id: &str) -> Result<()> {
        (**self).join_contest(contest_id, user_id).await
    }
}

/// Process-local contest store. Joins behave like a document-store
/// array-union: an id already present is left alone.
#[derive(Clone, Default)]
pub struct InMemoryContestRepository {
    contests: Arc<RwLock<HashMap<String, Contest>>>,
    join_failure: Arc<RwLock<Option<SharedError>>>,
}

impl InMemoryContestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent join fail with `error` until cleared.
    pub async fn fail_joins_with(&self, error: Option<SharedError>) {
        *self.join_failure.write().await = error;
    }
}

#[async_trait]
impl ContestRepository for InMemoryContestRepository {
    async fn create(&self, contest: Contest) -> Result<Contest> {
        contest.validate_fields()?;

        let mut contests = self.contests.write().await;
        if contests.contains_key(&contest.id) {
            return Err(SharedError::Conflict(format!(
                "Contest {} already exists",
                contest.id
            )));
        }
        info!("Created contest '{}' ({})", contest.title, contest.id);
        contests.insert(contest.id.clone(), contest.clone());
        Ok(contest)
    }

    async fn find_by_id(&self, id: &str) -> Option<Contest> {
        self.contests.read().await.get(id).cloned()
    }

    async fn find_all(&self) -> Vec<Contest> {
        let mut all: Vec<Contest> = self.contests.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        all
    }

    async fn join_contest(&self, contest_id: &str, user_id: &str) -> Result<()> {
        if let Some(err) = self.join_failure.read().await.clone() {
            warn!("Injected join failure for contest {}: {}", contest_id, err);
            return Err(err);
        }

        let mut contests = self.contests.write().await;
        let contest = contests
            .get_mut(contest_id)
            .ok_or_else(|| SharedError::NotFound(format!("Contest {} not found", contest_id)))?;

        if contest.has_participant(user_id) {
            debug!("User {} already in contest {}; nothing to append", user_id, contest_id);
            return Ok(());
        }
        if contest.is_full() {
            return Err(SharedError::Conflict(format!(
                "Contest {} is full",
                contest_id
            )));
        }

        contest.participants.push(user_id.to_string());
        info!(
            "User {} joined contest {} ({} participants)",
            user_id,
            contest_id,
            contest.participants.len()
        );
        Ok(())
    }
}
