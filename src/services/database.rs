//! Database service for the keyword store.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::Keyword;
use crate::services::metrics::DB_QUERY_DURATION;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "genai-gateway"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// List every stored keyword row in storage order.
    #[instrument(skip(self))]
    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_keywords"])
            .start_timer();

        let rows = sqlx::query_as::<_, Keyword>("SELECT category, word FROM keywords")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list keywords: {}", e))
            })?;

        timer.observe_duration();

        Ok(rows)
    }

    /// List distinct category values.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_categories"])
            .start_timer();

        let categories = sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM keywords")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list categories: {}", e))
            })?;

        timer.observe_duration();

        Ok(categories)
    }

    /// Insert every word under the category inside a single transaction.
    ///
    /// A conflict on the (category, word) constraint is a no-op, so the call
    /// is idempotent; any other failure rolls the whole batch back.
    #[instrument(skip(self, words), fields(category = %category, word_count = words.len()))]
    pub async fn add_keywords(&self, category: &str, words: &[String]) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_keywords"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        for word in words {
            let result = sqlx::query(
                "INSERT INTO keywords (category, word) VALUES ($1, $2) \
                 ON CONFLICT ON CONSTRAINT category_word_unique DO NOTHING",
            )
            .bind(category)
            .bind(word)
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                tx.rollback().await.ok();
                return Err(AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to insert keyword: {}",
                    e
                )));
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(word_count = words.len(), "Keywords added");

        Ok(())
    }
}
