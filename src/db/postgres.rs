use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{RecommendationStore, ScoreUpdate, StoreResult};
use crate::models::{NewRecommendation, Recommendation};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// PostgreSQL-backed recommendation store
///
/// Name uniqueness is enforced by the table's `UNIQUE` constraint. A score
/// change and the removal it may trigger share one transaction, so concurrent
/// requests never need an application-level lock.
#[derive(Clone)]
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn create(&self, recommendation: &NewRecommendation) -> StoreResult<Recommendation> {
        let row = sqlx::query_as::<_, Recommendation>(
            r#"
            INSERT INTO recommendations (name, youtube_link)
            VALUES ($1, $2)
            RETURNING id, name, youtube_link, score
            "#,
        )
        .bind(&recommendation.name)
        .bind(&recommendation.youtube_link)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Recommendation>> {
        let row = sqlx::query_as::<_, Recommendation>(
            "SELECT id, name, youtube_link, score FROM recommendations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Recommendation>> {
        let row = sqlx::query_as::<_, Recommendation>(
            "SELECT id, name, youtube_link, score FROM recommendations WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> StoreResult<Vec<Recommendation>> {
        let rows = sqlx::query_as::<_, Recommendation>(
            "SELECT id, name, youtube_link, score FROM recommendations ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update_score(
        &self,
        id: i32,
        delta: i32,
        remove_below: Option<i32>,
    ) -> StoreResult<Option<ScoreUpdate>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Recommendation>(
            r#"
            UPDATE recommendations
            SET score = score + $2
            WHERE id = $1
            RETURNING id, name, youtube_link, score
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(recommendation) = row else {
            return Ok(None);
        };

        let removed = match remove_below {
            Some(threshold) if recommendation.score < threshold => {
                sqlx::query("DELETE FROM recommendations WHERE id = $1 AND score < $2")
                    .bind(id)
                    .bind(threshold)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                    > 0
            }
            _ => false,
        };

        tx.commit().await?;

        Ok(Some(ScoreUpdate {
            recommendation,
            removed,
        }))
    }

    async fn truncate(&self) -> StoreResult<()> {
        sqlx::query("TRUNCATE TABLE recommendations")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
