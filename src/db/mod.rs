//! Recommendation persistence
//!
//! The service only talks to the `RecommendationStore` trait. PostgreSQL is the
//! production backend; the memory store backs local runs and tests.
use crate::{error::StoreError, models::{NewRecommendation, Recommendation}};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecommendationStore;
pub use postgres::{create_pool, run_migrations, PgRecommendationStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a score change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// The row as it stood right after the delta was applied
    pub recommendation: Recommendation,
    /// Whether the row was deleted in the same operation
    pub removed: bool,
}

/// Storage operations for recommendations
///
/// Implementations own atomicity: `update_score` must apply the delta and any
/// resulting removal as one unit, and `create` must reject a duplicate name
/// with `StoreError::UniqueViolation` even if the caller checked beforehand.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Inserts a new row with a score of 0
    async fn create(&self, recommendation: &NewRecommendation) -> StoreResult<Recommendation>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Recommendation>>;

    /// Exact, case-sensitive name lookup
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Recommendation>>;

    /// Every row, newest first
    async fn find_all(&self) -> StoreResult<Vec<Recommendation>>;

    /// Adds `delta` to the score, deleting the row when `remove_below` is set
    /// and the new score is strictly less than it. Returns `None` if the id
    /// does not exist. On error nothing is persisted.
    async fn update_score(
        &self,
        id: i32,
        delta: i32,
        remove_below: Option<i32>,
    ) -> StoreResult<Option<ScoreUpdate>>;

    /// Removes every row
    async fn truncate(&self) -> StoreResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
