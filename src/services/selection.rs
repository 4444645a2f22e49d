//! Recommendation selection
//!
//! Pure functions over a snapshot of recommendations. Nothing here touches the
//! store; callers fetch the snapshot and hand it in.
use rand::Rng;

use crate::models::Recommendation;

use super::policy::{HIGH_BUCKET_PROBABILITY, HIGH_SCORE_THRESHOLD};

/// Source of randomness for the weighted pick
///
/// Injected into the service so tests can script the draws.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 1)`
    fn unit(&self) -> f64;

    /// Uniform index in `0..len`; `len` is never zero
    fn index(&self, len: usize) -> usize;
}

/// Draws from the thread-local RNG on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Which half of the snapshot a pick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Score strictly above the high-score threshold
    High,
    Low,
}

impl Bucket {
    pub fn of(recommendation: &Recommendation) -> Self {
        if recommendation.score > HIGH_SCORE_THRESHOLD {
            Bucket::High
        } else {
            Bucket::Low
        }
    }
}

/// Picks one recommendation, favouring the high bucket
///
/// With probability `HIGH_BUCKET_PROBABILITY` the pick comes from the high
/// bucket when it has entries; otherwise from the low bucket, falling back to
/// the high bucket when the low one is empty. Returns `None` only for an empty
/// snapshot.
pub fn pick_weighted<'a>(
    snapshot: &'a [Recommendation],
    random: &dyn RandomSource,
) -> Option<&'a Recommendation> {
    let (high, low): (Vec<&Recommendation>, Vec<&Recommendation>) = snapshot
        .iter()
        .partition(|recommendation| Bucket::of(recommendation) == Bucket::High);

    let favour_high = random.unit() < HIGH_BUCKET_PROBABILITY;
    let pool = if favour_high && !high.is_empty() {
        &high
    } else if !low.is_empty() {
        &low
    } else {
        &high
    };

    if pool.is_empty() {
        return None;
    }

    Some(pool[random.index(pool.len())])
}

/// Ranks by score descending, ties by ascending id, keeping at most `amount`
pub fn top_n(mut snapshot: Vec<Recommendation>, amount: usize) -> Vec<Recommendation> {
    snapshot.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    snapshot.truncate(amount);
    snapshot
}
