//! Settings read from the process environment.
//!
//! Programs call [`load_dotenv`] first so a local `.env` file can supply the
//! same variables.

use crate::completion::{
    ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL, DEFAULT_HF_MODEL, DEFAULT_MAX_NEW_TOKENS,
    HF_ROUTER_BASE_URL,
};
use std::env;
use thiserror::Error;

pub const HF_API_KEY: &str = "HF_API_KEY";
pub const HF_MODEL_ID: &str = "HF_MODEL_ID";
pub const HF_BASE_URL: &str = "HF_BASE_URL";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_MODEL: &str = "ANTHROPIC_MODEL";
pub const ANTHROPIC_BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const LANGSMITH_API_KEY: &str = "LANGSMITH_API_KEY";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not found in environment variables.")]
    MissingVar(&'static str),
}

/// Load `.env` from the working directory if there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to read .env"),
    }
}

fn lookup(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    get(name).filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuggingFaceSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_new_tokens: u32,
}

impl HuggingFaceSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: lookup(&get, HF_API_KEY).ok_or(ConfigError::MissingVar(HF_API_KEY))?,
            model: lookup(&get, HF_MODEL_ID).unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            base_url: lookup(&get, HF_BASE_URL).unwrap_or_else(|| HF_ROUTER_BASE_URL.to_string()),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl AnthropicSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: lookup(&get, ANTHROPIC_API_KEY)
                .ok_or(ConfigError::MissingVar(ANTHROPIC_API_KEY))?,
            model: lookup(&get, ANTHROPIC_MODEL)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            base_url: lookup(&get, ANTHROPIC_BASE_URL_VAR)
                .unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
        })
    }
}

/// LangSmith key, if run tracing is wanted.
pub fn langsmith_api_key() -> Option<String> {
    lookup(&|name: &str| env::var(name).ok(), LANGSMITH_API_KEY)
}
