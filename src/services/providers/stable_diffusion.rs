//! Stable Diffusion text2img provider.
//!
//! The vendor carries the API key in the request body rather than a header.
//! Fields pass through as received; absent optional fields forward as
//! explicit null, which the vendor treats as randomize/omit.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderError;
use crate::services::metrics::UPSTREAM_REQUEST_DURATION;

/// Client-facing text2img options, passed through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Text2ImgOptions {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub samples: Option<i64>,
    pub num_inference_steps: Option<i64>,
    pub seed: Option<i64>,
    pub guidance_scale: Option<f64>,
    pub webhook: Option<String>,
    pub track_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct Text2ImgPayload {
    key: String,
    prompt: Option<String>,
    negative_prompt: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    samples: Option<i64>,
    num_inference_steps: Option<i64>,
    seed: Option<i64>,
    guidance_scale: Option<f64>,
    webhook: Option<String>,
    track_id: Option<String>,
}

/// Stable Diffusion API client.
#[derive(Clone)]
pub struct StableDiffusionProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl StableDiffusionProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            base_url,
            client,
        }
    }

    fn payload(&self, options: Text2ImgOptions) -> Text2ImgPayload {
        Text2ImgPayload {
            key: self.api_key.clone(),
            prompt: options.prompt,
            negative_prompt: options.negative_prompt,
            width: options.width,
            height: options.height,
            samples: options.samples,
            num_inference_steps: options.num_inference_steps,
            seed: options.seed,
            guidance_scale: options.guidance_scale,
            webhook: options.webhook,
            track_id: options.track_id,
        }
    }

    /// Generate an image, relaying the upstream response body verbatim.
    pub async fn text_to_image(&self, options: Text2ImgOptions) -> Result<Value, ProviderError> {
        let payload = self.payload(options);
        let url = format!("{}/text2img", self.base_url);

        tracing::debug!(url = %url, "Sending request to Stable Diffusion API");

        let timer = UPSTREAM_REQUEST_DURATION
            .with_label_values(&["stable_diffusion"])
            .start_timer();

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        timer.observe_duration();

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "Stable Diffusion API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))
    }
}
