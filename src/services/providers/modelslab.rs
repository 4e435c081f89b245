//! ModelsLab realtime text2img provider.
//!
//! Every payload field independently defaults when absent from the request.
//! Seed, webhook and track_id default to explicit null, which tells the
//! vendor to randomize/omit them.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderError;
use crate::services::metrics::UPSTREAM_REQUEST_DURATION;

const DEFAULT_PROMPT: &str =
    "ultra realistic close up portrait ((beautiful pale cyberpunk female with heavy black eyeliner))";
const DEFAULT_NEGATIVE_PROMPT: &str = "bad quality";
const DEFAULT_WIDTH: i64 = 512;
const DEFAULT_HEIGHT: i64 = 512;
// max 4
const DEFAULT_SAMPLES: i64 = 1;
const DEFAULT_GUIDANCE_SCALE: f64 = 5.0;

/// Client-facing realtime text2img options; absent fields take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeText2ImgOptions {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub samples: Option<i64>,
    pub safety_checker: Option<bool>,
    pub seed: Option<i64>,
    pub guidance_scale: Option<f64>,
    pub webhook: Option<String>,
    pub track_id: Option<String>,
    pub instant_response: Option<bool>,
    pub base64: Option<bool>,
}

#[derive(Debug, Serialize)]
struct RealtimeText2ImgPayload {
    key: String,
    prompt: String,
    negative_prompt: String,
    width: i64,
    height: i64,
    samples: i64,
    safety_checker: bool,
    seed: Option<i64>,
    guidance_scale: f64,
    webhook: Option<String>,
    track_id: Option<String>,
    instant_response: bool,
    base64: bool,
}

/// ModelsLab realtime API client.
#[derive(Clone)]
pub struct ModelsLabProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ModelsLabProvider {
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

    fn payload(&self, options: RealtimeText2ImgOptions) -> RealtimeText2ImgPayload {
        RealtimeText2ImgPayload {
            key: self.api_key.clone(),
            prompt: options
                .prompt
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            negative_prompt: options
                .negative_prompt
                .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string()),
            width: options.width.unwrap_or(DEFAULT_WIDTH),
            height: options.height.unwrap_or(DEFAULT_HEIGHT),
            samples: options.samples.unwrap_or(DEFAULT_SAMPLES),
            safety_checker: options.safety_checker.unwrap_or(false),
            seed: options.seed,
            guidance_scale: options.guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE),
            webhook: options.webhook,
            track_id: options.track_id,
            instant_response: options.instant_response.unwrap_or(false),
            base64: options.base64.unwrap_or(false),
        }
    }

    /// Generate an image, relaying the upstream response body verbatim.
    pub async fn text_to_image(
        &self,
        options: RealtimeText2ImgOptions,
    ) -> Result<Value, ProviderError> {
        let payload = self.payload(options);
        let url = format!("{}/text2img", self.base_url);

        tracing::debug!(url = %url, "Sending request to ModelsLab API");

        let timer = UPSTREAM_REQUEST_DURATION
            .with_label_values(&["modelslab"])
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
                "ModelsLab API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ModelsLabProvider {
        ModelsLabProvider::new("test-sd-key".to_string(), "http://localhost".to_string())
    }

    #[test]
    fn payload_applies_every_default_when_request_is_empty() {
        let payload = provider().payload(RealtimeText2ImgOptions::default());

        assert_eq!(payload.prompt, DEFAULT_PROMPT);
        assert_eq!(payload.negative_prompt, "bad quality");
        assert_eq!(payload.width, 512);
        assert_eq!(payload.height, 512);
        assert_eq!(payload.samples, 1);
        assert!(!payload.safety_checker);
        assert_eq!(payload.seed, None);
        assert_eq!(payload.guidance_scale, 5.0);
        assert_eq!(payload.webhook, None);
        assert_eq!(payload.track_id, None);
        assert!(!payload.instant_response);
        assert!(!payload.base64);
    }

    #[test]
    fn null_defaults_serialize_as_explicit_null() {
        let payload = provider().payload(RealtimeText2ImgOptions::default());
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json["seed"].is_null());
        assert!(json["webhook"].is_null());
        assert!(json["track_id"].is_null());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let payload = provider().payload(RealtimeText2ImgOptions {
            prompt: Some("a fox".to_string()),
            safety_checker: Some(true),
            seed: Some(7),
            guidance_scale: Some(3.5),
            instant_response: Some(true),
            ..Default::default()
        });

        assert_eq!(payload.prompt, "a fox");
        assert!(payload.safety_checker);
        assert_eq!(payload.seed, Some(7));
        assert_eq!(payload.guidance_scale, 3.5);
        assert!(payload.instant_response);
    }
}
