//! OpenAI provider: image generation and chat completions.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderError;
use crate::config::OpenAiConfig;
use crate::services::metrics::UPSTREAM_REQUEST_DURATION;

const DEFAULT_SIZE: &str = "1024x1024";
const DEFAULT_N: i32 = 1;
// "hd" or "standard"
const DEFAULT_QUALITY: &str = "standard";

/// Single role/content message in a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Exchange substituted wholesale when a chat request carries no messages.
fn default_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: "You are a helpful assistant.".to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: "Tell me a joke.".to_string(),
        },
    ]
}

/// Client-facing image generation options; absent fields take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageOptions {
    pub prompt: Option<String>,
    pub size: Option<String>,
    pub n: Option<i32>,
    pub quality: Option<String>,
}

/// Client-facing chat completion options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatOptions {
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize)]
struct ImagesPayload {
    model: String,
    prompt: Option<String>,
    n: i32,
    size: String,
    quality: String,
}

#[derive(Debug, Serialize)]
struct ChatPayload {
    model: String,
    messages: Vec<ChatMessage>,
}

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn images_payload(&self, options: ImageOptions) -> ImagesPayload {
        ImagesPayload {
            model: self.config.image_model.clone(),
            prompt: options.prompt,
            n: options.n.unwrap_or(DEFAULT_N),
            size: options.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            quality: options
                .quality
                .unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
        }
    }

    fn chat_payload(&self, options: ChatOptions) -> ChatPayload {
        ChatPayload {
            model: self.config.chat_model.clone(),
            messages: options.messages.unwrap_or_else(default_messages),
        }
    }

    /// Generate images, relaying the upstream response body verbatim.
    pub async fn generate_image(&self, options: ImageOptions) -> Result<Value, ProviderError> {
        let payload = self.images_payload(options);
        let url = format!("{}/images/generations", self.config.base_url);

        tracing::debug!(
            model = %payload.model,
            n = payload.n,
            size = %payload.size,
            "Sending image generation request to OpenAI API"
        );

        self.forward(&url, &payload).await
    }

    /// Run a chat completion, relaying the upstream response body verbatim.
    pub async fn chat_completion(&self, options: ChatOptions) -> Result<Value, ProviderError> {
        let payload = self.chat_payload(options);
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(
            model = %payload.model,
            message_count = payload.messages.len(),
            "Sending chat completion request to OpenAI API"
        );

        self.forward(&url, &payload).await
    }

    async fn forward<T: Serialize>(&self, url: &str, payload: &T) -> Result<Value, ProviderError> {
        let timer = UPSTREAM_REQUEST_DURATION
            .with_label_values(&["openai"])
            .start_timer();

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        timer.observe_duration();

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))
    }
}
