use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{RecommendationStore, ScoreUpdate, StoreResult};
use crate::error::StoreError;
use crate::models::{NewRecommendation, Recommendation};

/// In-process recommendation store
///
/// Mirrors the PostgreSQL table semantics: ids come from a monotonic counter
/// that is never rewound (not even by `truncate`), and names are unique.
#[derive(Clone, Default)]
pub struct MemoryRecommendationStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    rows: BTreeMap<i32, Recommendation>,
    last_id: i32,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row with a preset score, bypassing the vote path
    pub async fn insert_with_score(
        &self,
        recommendation: &NewRecommendation,
        score: i32,
    ) -> StoreResult<Recommendation> {
        let mut inner = self.inner.write().await;

        if inner.rows.values().any(|row| row.name == recommendation.name) {
            return Err(StoreError::UniqueViolation(format!(
                "duplicate name \"{}\"",
                recommendation.name
            )));
        }

        inner.last_id += 1;
        let row = Recommendation {
            id: inner.last_id,
            name: recommendation.name.clone(),
            youtube_link: recommendation.youtube_link.clone(),
            score,
        };
        inner.rows.insert(row.id, row.clone());

        Ok(row)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl RecommendationStore for MemoryRecommendationStore {
    async fn create(&self, recommendation: &NewRecommendation) -> StoreResult<Recommendation> {
        self.insert_with_score(recommendation, 0).await
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Recommendation>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().find(|row| row.name == name).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().rev().cloned().collect())
    }

    async fn update_score(
        &self,
        id: i32,
        delta: i32,
        remove_below: Option<i32>,
    ) -> StoreResult<Option<ScoreUpdate>> {
        let mut inner = self.inner.write().await;

        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.score = row
            .score
            .checked_add(delta)
            .ok_or(StoreError::ScoreOutOfRange(id))?;
        let recommendation = row.clone();

        let removed = matches!(remove_below, Some(threshold) if recommendation.score < threshold);
        if removed {
            inner.rows.remove(&id);
        }

        Ok(Some(ScoreUpdate {
            recommendation,
            removed,
        }))
    }

    async fn truncate(&self) -> StoreResult<()> {
        self.inner.write().await.rows.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
