//! Store abstractions for assessments and profiles.
//!
//! The service layer depends on these traits, not on a concrete backend, so
//! a durable store can replace the in-memory maps without touching business
//! logic. Data in the in-memory implementations does NOT survive restarts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::models::{Assessment, PersonalityProfile};

/// An assessment shared behind its own lock. Each operation locks exactly
/// one assessment, so work on different ids never interferes and an
/// in-flight analysis holds its lock across the gateway awaits.
pub type SharedAssessment = Arc<Mutex<Assessment>>;

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert(&self, assessment: Assessment) -> SharedAssessment;
    async fn get(&self, id: &str) -> Option<SharedAssessment>;
    /// Point-in-time copies of every assessment, for read-only analytics.
    async fn snapshot(&self) -> Vec<Assessment>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Overwrite-by-candidate-id semantics; no versioning.
    async fn save(&self, profile: PersonalityProfile);
    async fn get(&self, candidate_id: &str) -> Option<PersonalityProfile>;
    async fn snapshot(&self) -> Vec<PersonalityProfile>;
}

#[derive(Default)]
pub struct InMemoryAssessmentStore {
    inner: RwLock<HashMap<String, SharedAssessment>>,
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn insert(&self, assessment: Assessment) -> SharedAssessment {
        let id = assessment.id.clone();
        let shared = Arc::new(Mutex::new(assessment));
        self.inner.write().await.insert(id, shared.clone());
        shared
    }

    async fn get(&self, id: &str) -> Option<SharedAssessment> {
        self.inner.read().await.get(id).cloned()
    }

    async fn snapshot(&self) -> Vec<Assessment> {
        let entries: Vec<SharedAssessment> = self.inner.read().await.values().cloned().collect();
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(entry.lock().await.clone());
        }
        out
    }
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<HashMap<String, PersonalityProfile>>,
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn save(&self, profile: PersonalityProfile) {
        self.inner
            .write()
            .await
            .insert(profile.candidate_id.clone(), profile);
    }

    async fn get(&self, candidate_id: &str) -> Option<PersonalityProfile> {
        self.inner.read().await.get(candidate_id).cloned()
    }

    async fn snapshot(&self) -> Vec<PersonalityProfile> {
        self.inner.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::MODEL_TYPE_BIG_FIVE;

    fn profile(candidate_id: &str, summary: &str) -> PersonalityProfile {
        PersonalityProfile {
            candidate_id: candidate_id.to_string(),
            model_type: MODEL_TYPE_BIG_FIVE.to_string(),
            traits: Vec::new(),
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn test_profile_save_overwrites_by_candidate() {
        let store = InMemoryProfileStore::default();
        store.save(profile("cand-1", "first")).await;
        store.save(profile("cand-1", "second")).await;

        let stored = store.get("cand-1").await.unwrap();
        assert_eq!(stored.summary, "second");
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_get_unknown_candidate() {
        let store = InMemoryProfileStore::default();
        assert!(store.get("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_assessment_mutation_through_shared_handle_is_visible() {
        let store = InMemoryAssessmentStore::default();
        let shared = store
            .insert(Assessment::new("a1".into(), "cand-1".into(), None))
            .await;

        shared.lock().await.status = crate::models::AssessmentStatus::PendingAnalysis;

        let reread = store.get("a1").await.unwrap();
        assert_eq!(
            reread.lock().await.status,
            crate::models::AssessmentStatus::PendingAnalysis
        );
    }

    #[tokio::test]
    async fn test_assessment_snapshot_copies_all_entries() {
        let store = InMemoryAssessmentStore::default();
        store
            .insert(Assessment::new("a1".into(), "cand-1".into(), None))
            .await;
        store
            .insert(Assessment::new("a2".into(), "cand-2".into(), None))
            .await;

        assert_eq!(store.snapshot().await.len(), 2);
    }
}
