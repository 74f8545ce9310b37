//! Runtime configuration
//!
//! Everything is read once at startup into [`Config`] and passed by reference
//! into the constructors that need it.

use crate::prompts::PromptVersion;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// API key for the vision service.
///
/// Surrounding whitespace is stripped on construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Configuration("API key is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Which wire protocol is used to reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    /// Native `generateContent` REST endpoint.
    #[default]
    Gemini,
    /// The provider's OpenAI-compatible chat completions endpoint.
    OpenAiCompat,
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai-compat" | "openai" => Ok(Self::OpenAiCompat),
            other => Err(Error::Configuration(format!(
                "Unknown transport '{}'. Expected 'gemini' or 'openai-compat'",
                other
            ))),
        }
    }
}

/// Where the credential is attached on native Gemini requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPlacement {
    /// `?key=<credential>`
    #[default]
    Query,
    /// `x-goog-api-key: <credential>`
    Header,
}

impl FromStr for AuthPlacement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            other => Err(Error::Configuration(format!(
                "Unknown auth placement '{}'. Expected 'query' or 'header'",
                other
            ))),
        }
    }
}

/// Endpoint and model selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_version: String,
    /// Bare model ID, never `models/`-prefixed.
    pub model: String,
}

impl ModelConfig {
    pub fn new(base_url: &str, api_version: &str, model: &str) -> Self {
        let model = model.trim();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_version: api_version.trim().trim_matches('/').to_string(),
            model: model.strip_prefix("models/").unwrap_or(model).to_string(),
        }
    }

    /// `{base_url}/{api_version}`
    pub fn versioned_base(&self) -> String {
        format!("{}/{}", self.base_url, self.api_version)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_VERSION, DEFAULT_MODEL)
    }
}

/// Bounded retry for rate-limited and server-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Credential,
    pub model: ModelConfig,
    pub transport: TransportKind,
    pub auth: AuthPlacement,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub prompt_version: PromptVersion,
    pub jpeg_quality: u8,
    pub max_image_dimension: Option<u32>,
}

impl Config {
    /// Defaults for everything except the credential and model selection.
    pub fn new(credential: Credential, model: ModelConfig) -> Self {
        Self {
            credential,
            model,
            transport: TransportKind::default(),
            auth: AuthPlacement::default(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            prompt_version: PromptVersion::default(),
            jpeg_quality: 85,
            max_image_dimension: Some(2048),
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_key = lookup("GOOGLE_API_KEY").ok_or_else(|| {
            Error::Configuration("GOOGLE_API_KEY not set".to_string())
        })?;
        let credential = Credential::new(&raw_key)
            .map_err(|_| Error::Configuration("GOOGLE_API_KEY is blank".to_string()))?;

        let model = ModelConfig::new(
            &lookup("CABINET_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            &lookup("CABINET_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            &lookup("CABINET_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        );
        if model.model.is_empty() {
            return Err(Error::Configuration("CABINET_MODEL is blank".to_string()));
        }

        let mut config = Self::new(credential, model);

        if let Some(value) = lookup("CABINET_TRANSPORT") {
            config.transport = value.parse()?;
        }
        if let Some(value) = lookup("CABINET_AUTH") {
            config.auth = value.parse()?;
        }
        if let Some(value) = lookup("CABINET_PROMPT_VERSION") {
            config.prompt_version = value.parse()?;
        }

        let timeout_secs: u64 = parse_var(&lookup, "CABINET_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(Error::Configuration(
                "CABINET_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        config.timeout = Duration::from_secs(timeout_secs);

        config.retry = RetryPolicy {
            max_retries: parse_var(&lookup, "CABINET_MAX_RETRIES", 0)?,
            base_delay: Duration::from_millis(parse_var(&lookup, "CABINET_RETRY_BASE_MS", 1000)?),
        };

        let quality: u8 = parse_var(&lookup, "CABINET_JPEG_QUALITY", 85)?;
        if !(1..=100).contains(&quality) {
            return Err(Error::Configuration(format!(
                "CABINET_JPEG_QUALITY must be between 1 and 100, got {}",
                quality
            )));
        }
        config.jpeg_quality = quality;

        let max_dimension: u32 = parse_var(&lookup, "CABINET_MAX_IMAGE_DIMENSION", 2048)?;
        config.max_image_dimension = (max_dimension > 0).then_some(max_dimension);

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            Error::Configuration(format!("Invalid value '{}' for {}: {}", raw.trim(), key, e))
        }),
    }
}
