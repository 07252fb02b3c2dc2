//! In-process candidate storage, selected with `STORAGE_BACKEND=memory`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateFilter, CandidateStatistics, NewCandidate};
use crate::services::candidate_service::CandidateRepository;

#[derive(Debug, Clone, Default)]
pub struct MemoryCandidateRepository {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    rows: BTreeMap<i32, Candidate>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, exclude_id: Option<i32>) -> bool {
        let email = email.to_lowercase();
        self.rows
            .values()
            .any(|c| Some(c.id) != exclude_id && c.email.to_lowercase() == email)
    }
}

impl MemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateRepository for MemoryCandidateRepository {
    async fn list(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.email_taken(email, exclude_id))
    }

    async fn create(&self, data: &NewCandidate) -> Result<Candidate> {
        let mut state = self.state.write().await;
        if state.email_taken(&data.email, None) {
            return Err(Error::email_conflict());
        }

        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::Internal("candidate id sequence exhausted".to_string()))?;
        let now = Utc::now();
        let candidate = Candidate {
            id,
            name: data.name.clone(),
            age: data.age,
            email: data.email.clone(),
            phone: data.phone.clone(),
            skills: data.skills.clone(),
            experience: data.experience,
            applied_position: data.applied_position.clone(),
            status: data.status,
            created_at: now,
            updated_at: now,
        };
        state.last_id = id;
        state.rows.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update(&self, id: i32, data: &NewCandidate) -> Result<Candidate> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Err(Error::candidate_not_found(id));
        }
        if state.email_taken(&data.email, Some(id)) {
            return Err(Error::email_conflict());
        }

        let row = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| Error::candidate_not_found(id))?;
        row.name = data.name.clone();
        row.age = data.age;
        row.email = data.email.clone();
        row.phone = data.phone.clone();
        row.skills = data.skills.clone();
        row.experience = data.experience;
        row.applied_position = data.applied_position.clone();
        row.status = data.status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(&id).is_some())
    }

    async fn statistics(&self) -> Result<CandidateStatistics> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .fold(CandidateStatistics::default(), |mut stats, c| {
                stats.record(c.status);
                stats
            }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
