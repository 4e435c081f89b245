//! Common test utilities for gateway integration tests.

use genai_gateway::config::{
    CommonConfig, DatabaseConfig, GatewayConfig, OpenAiConfig, StableDiffusionConfig,
};
use genai_gateway::startup::Application;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Once;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,genai_gateway=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A running gateway wired to a mock upstream and the test database.
pub struct TestApp {
    pub address: String,
    pub upstream: MockServer,
    pub pool: PgPool,
    client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application on a random port against a fresh mock upstream.
    pub async fn spawn() -> Self {
        init_tracing();

        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set to run integration tests");

        let upstream = MockServer::start().await;

        let config = GatewayConfig {
            common: CommonConfig { port: 0 },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 2,
                min_connections: 1,
            },
            openai: OpenAiConfig {
                api_key: "test-api-key".to_string(),
                base_url: format!("{}/v1", upstream.uri()),
                image_model: "dall-e-3".to_string(),
                chat_model: "gpt-4-turbo-preview".to_string(),
            },
            stable_diffusion: StableDiffusionConfig {
                api_key: "test-sd-key".to_string(),
                base_url: format!("{}/api/v3", upstream.uri()),
                modelslab_base_url: format!("{}/api/v6/realtime", upstream.uri()),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let port = app.port();

        // Start the application in the background
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .expect("Failed to connect test database pool");

        let address = format!("http://127.0.0.1:{}", port);
        let client = reqwest::Client::new();

        // Wait for the server to accept requests with retry
        let mut attempts = 0;
        loop {
            match client.get(format!("{}/health", address)).send().await {
                Ok(_) => break,
                Err(_) if attempts < 20 => {
                    attempts += 1;
                    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
                }
                Err(e) => panic!("Server did not become ready after 20 attempts: {}", e),
            }
        }

        TestApp {
            address,
            upstream,
            pool,
            client,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Remove every row stored under the given categories.
    ///
    /// Tests isolate themselves with unique category names, so this only has
    /// to clear a test's own rows (including leftovers from earlier runs).
    pub async fn cleanup_categories(&self, categories: &[&str]) {
        for category in categories {
            sqlx::query("DELETE FROM keywords WHERE category = $1")
                .bind(category)
                .execute(&self.pool)
                .await
                .expect("Failed to clean up test rows");
        }
    }

    /// Fetch the stored words for one category via the public API.
    pub async fn stored_words(&self, category: &str) -> Vec<String> {
        let rows: Vec<serde_json::Value> = self
            .client
            .get(format!("{}/keywords", self.address))
            .send()
            .await
            .expect("Failed to list keywords")
            .json()
            .await
            .expect("Failed to parse keywords response");

        let mut words: Vec<String> = rows
            .iter()
            .filter(|row| row["category"] == category)
            .map(|row| row["word"].as_str().unwrap_or_default().to_string())
            .collect();
        words.sort();
        words
    }
}
