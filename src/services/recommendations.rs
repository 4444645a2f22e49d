use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::RecommendationStore,
    error::{AppError, AppResult, StoreError},
    models::{NewRecommendation, Recommendation},
    services::{
        policy::REMOVAL_THRESHOLD,
        selection::{self, RandomSource},
    },
};

const DUPLICATE_NAME_MESSAGE: &str = "Recommendations names must be unique";

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    fn delta(self) -> i32 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }

    /// Only downvotes can push a recommendation out
    fn remove_below(self) -> Option<i32> {
        match self {
            Vote::Up => None,
            Vote::Down => Some(REMOVAL_THRESHOLD),
        }
    }
}

/// Business rules around recommendations
///
/// Enforces name uniqueness on insert, applies votes with the auto-removal
/// threshold, and hands snapshots to the selection functions. Holds no state
/// of its own beyond the injected store and randomness source.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn RecommendationStore>,
    random: Arc<dyn RandomSource>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn RecommendationStore>, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    /// Creates a recommendation with a score of 0
    ///
    /// The name lookup is a fast path; a unique-constraint violation from the
    /// store (two concurrent inserts of the same name) maps to the same
    /// `Conflict`.
    #[instrument(skip(self, recommendation), fields(name = %recommendation.name))]
    pub async fn insert(&self, recommendation: NewRecommendation) -> AppResult<Recommendation> {
        if self
            .store
            .find_by_name(&recommendation.name)
            .await?
            .is_some()
        {
            tracing::warn!("Rejected duplicate recommendation name");
            return Err(AppError::Conflict(DUPLICATE_NAME_MESSAGE.to_string()));
        }

        match self.store.create(&recommendation).await {
            Ok(created) => {
                tracing::info!(recommendation_id = created.id, "Recommendation created");
                Ok(created)
            }
            Err(StoreError::UniqueViolation(detail)) => {
                tracing::warn!(detail = %detail, "Store rejected duplicate recommendation name");
                Err(AppError::Conflict(DUPLICATE_NAME_MESSAGE.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn upvote(&self, id: i32) -> AppResult<()> {
        self.vote(id, Vote::Up).await
    }

    /// Lowers the score by one, deleting the recommendation once the score
    /// drops below `REMOVAL_THRESHOLD`
    pub async fn downvote(&self, id: i32) -> AppResult<()> {
        self.vote(id, Vote::Down).await
    }

    /// Applies the vote and any resulting removal in a single store call
    #[instrument(skip(self))]
    async fn vote(&self, id: i32, vote: Vote) -> AppResult<()> {
        let update = self
            .store
            .update_score(id, vote.delta(), vote.remove_below())
            .await?
            .ok_or_else(|| not_found(id))?;

        let score = update.recommendation.score;
        if update.removed {
            tracing::info!(
                recommendation_id = id,
                score,
                "Recommendation removed after falling below score threshold"
            );
        } else {
            tracing::debug!(recommendation_id = id, score, "Vote applied");
        }

        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Recommendation> {
        self.store.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn get_all(&self) -> AppResult<Vec<Recommendation>> {
        Ok(self.store.find_all().await?)
    }

    /// Weighted random pick over every stored recommendation
    pub async fn get_random(&self) -> AppResult<Recommendation> {
        let snapshot = self.store.find_all().await?;

        selection::pick_weighted(&snapshot, self.random.as_ref())
            .cloned()
            .ok_or_else(|| AppError::NotFound("Empty list".to_string()))
    }

    /// The `amount` highest-scoring recommendations
    pub async fn get_top(&self, amount: usize) -> AppResult<Vec<Recommendation>> {
        if amount == 0 {
            return Err(AppError::InvalidInput(
                "amount must be a positive integer".to_string(),
            ));
        }

        let snapshot = self.store.find_all().await?;
        Ok(selection::top_n(snapshot, amount))
    }

    /// Removes every recommendation
    pub async fn reset(&self) -> AppResult<()> {
        self.store.truncate().await?;
        tracing::warn!(store = self.store.name(), "All recommendations removed");
        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Recommendation {} not found", id))
}
