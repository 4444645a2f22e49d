//! Fixed scoring and selection policy

/// A downvote that leaves the score strictly below this deletes the recommendation
pub const REMOVAL_THRESHOLD: i32 = -5;

/// Recommendations scoring strictly above this belong to the high bucket
pub const HIGH_SCORE_THRESHOLD: i32 = 10;

/// Probability that a random pick is drawn from the high bucket
pub const HIGH_BUCKET_PROBABILITY: f64 = 0.7;
