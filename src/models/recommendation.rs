use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A stored song recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Store-assigned identifier, never reused
    pub id: i32,
    /// Unique display name (e.g., "Falamansa - Xote dos Milagres")
    pub name: String,
    /// Link to the song on YouTube
    pub youtube_link: String,
    /// Net tally of upvotes minus downvotes
    pub score: i32,
}

/// Payload for creating a recommendation
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    pub name: String,
    pub youtube_link: String,
}

impl NewRecommendation {
    pub fn new(name: impl Into<String>, youtube_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            youtube_link: youtube_link.into(),
        }
    }

    /// Rejects empty fields
    pub fn validate(&self) -> AppResult<()> {
        if self.name.is_empty() {
            return Err(AppError::InvalidInput("\"name\" must not be empty".to_string()));
        }
        if self.youtube_link.is_empty() {
            return Err(AppError::InvalidInput(
                "\"youtubeLink\" must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
