pub mod policy;
pub mod recommendations;
pub mod selection;

pub use recommendations::{RecommendationService, Vote};
pub use selection::{RandomSource, ThreadRandom};
