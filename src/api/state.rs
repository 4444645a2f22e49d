use std::sync::Arc;

use crate::db::{MemoryRecommendationStore, RecommendationStore};
use crate::services::{RandomSource, RecommendationService, ThreadRandom};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: RecommendationService,
    /// Whether `/testing/reset` is mounted
    pub test_routes_enabled: bool,
}

impl AppState {
    pub fn new(recommendations: RecommendationService) -> Self {
        Self {
            recommendations,
            test_routes_enabled: false,
        }
    }

    /// Builds state over a store with thread-local randomness
    pub fn with_store(store: Arc<dyn RecommendationStore>) -> Self {
        let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);
        Self::new(RecommendationService::new(store, random))
    }

    /// Builds state over an empty in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryRecommendationStore::new()))
    }

    pub fn with_test_routes(mut self, enabled: bool) -> Self {
        self.test_routes_enabled = enabled;
        self
    }
}
