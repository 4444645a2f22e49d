mod recommendation;

pub use recommendation::{NewRecommendation, Recommendation};
