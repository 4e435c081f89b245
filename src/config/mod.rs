use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl CommonConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub database: DatabaseConfig,
    pub openai: OpenAiConfig,
    pub stable_diffusion: StableDiffusionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model for image generation (e.g., dall-e-3)
    pub image_model: String,
    /// Model for chat completions (e.g., gpt-4-turbo-preview)
    pub chat_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StableDiffusionConfig {
    pub api_key: String,
    /// Base URL of the Stable Diffusion text2img API
    pub base_url: String,
    /// Base URL of the ModelsLab realtime text2img API
    pub modelslab_base_url: String,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = CommonConfig::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(GatewayConfig {
            common,
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("5"), is_prod)?
                    .parse()
                    .unwrap_or(5),
                min_connections: get_env("DATABASE_MIN_CONNECTIONS", Some("1"), is_prod)?
                    .parse()
                    .unwrap_or(1),
            },
            openai: OpenAiConfig {
                api_key: get_env("OPENAI_API_KEY", None, is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some("https://api.openai.com/v1"), is_prod)?,
                image_model: get_env("OPENAI_IMAGE_MODEL", Some("dall-e-3"), is_prod)?,
                chat_model: get_env("OPENAI_CHAT_MODEL", Some("gpt-4-turbo-preview"), is_prod)?,
            },
            stable_diffusion: StableDiffusionConfig {
                api_key: get_env("STABLE_DIFFUSION_API_KEY", None, is_prod)?,
                base_url: get_env(
                    "STABLE_DIFFUSION_BASE_URL",
                    Some("https://stablediffusionapi.com/api/v3"),
                    is_prod,
                )?,
                modelslab_base_url: get_env(
                    "MODELSLAB_BASE_URL",
                    Some("https://modelslab.com/api/v6/realtime"),
                    is_prod,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
