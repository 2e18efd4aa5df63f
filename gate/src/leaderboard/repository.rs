use async_trait::async_trait;
use log::debug;
use shared::{Participation, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    /// Records for a contest in arrival order
    async fn participations(&self, contest_id: &str) -> Result<Vec<Participation>>;
    /// Sets a user's score, appending the user if new.
    async fn record_score(&self, contest_id: &str, user_id: &str, score: f64) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct InMemoryParticipationRepository {
    records: Arc<RwLock<HashMap<String, Vec<Participation>>>>,
}

impl InMemoryParticipationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipationRepository for InMemoryParticipationRepository {
    async fn participations(&self, contest_id: &str) -> Result<Vec<Participation>> {
        Ok(self
            .records
            .read()
            .await
            .get(contest_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_score(&self, contest_id: &str, user_id: &str, score: f64) -> Result<()> {
        let mut records = self.records.write().await;
        let entries = records.entry(contest_id.to_string()).or_default();
        match entries.iter_mut().find(|p| p.user_id == user_id) {
            Some(existing) => existing.score = score,
            None => entries.push(Participation {
                user_id: user_id.to_string(),
                score,
            }),
        }
        debug!("Recorded score {} for {} in contest {}", score, user_id, contest_id);
        Ok(())
    }
}
