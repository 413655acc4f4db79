//! Runtime configuration

use crate::error::{Error, Result};
use std::time::Duration;

/// Hosted model family used for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Messages API with content parts (also serves remote extraction)
    Messages,
    /// Gemini `generateContent`
    Gemini,
}

impl Provider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::Messages => "https://api.anthropic.com/v1/messages",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Messages => "claude-sonnet-4-5",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    /// Provider-specific variable consulted when `PDF_QA_API_KEY` is unset
    fn fallback_key_var(self) -> &'static str {
        match self {
            Provider::Messages => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "messages" | "anthropic" | "claude" => Ok(Provider::Messages),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(Error::Config {
                reason: format!("Unknown provider: {}", other),
            }),
        }
    }
}

/// How uploaded PDFs are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStrategy {
    /// PDFium on this machine
    #[default]
    Local,
    /// Hosted model reading the PDF as a document part
    Remote,
}

impl std::str::FromStr for ExtractionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ExtractionStrategy::Local),
            "remote" => Ok(ExtractionStrategy::Remote),
            other => Err(Error::Config {
                reason: format!("Unknown extraction strategy: {}", other),
            }),
        }
    }
}

/// Configuration for the Q&A session
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential for the hosted model
    pub api_key: String,
    /// Answer provider (default: messages)
    pub provider: Provider,
    /// Endpoint URL (default: provider's public endpoint)
    pub endpoint: String,
    /// Model identifier (default: provider's default model)
    pub model: String,
    /// Output-token cap per request (default: 1024)
    pub max_tokens: u32,
    /// Text extraction strategy (default: local)
    pub extraction: ExtractionStrategy,
    /// HTTP request timeout (default: 120s)
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let provider = Provider::Messages;
        Self {
            api_key: String::new(),
            provider,
            endpoint: provider.default_endpoint().to_string(),
            model: provider.default_model().to_string(),
            max_tokens: 1024,
            extraction: ExtractionStrategy::Local,
            timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    /// Read configuration from `PDF_QA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("PDF_QA_PROVIDER") {
            Some(p) => p.parse()?,
            None => Provider::Messages,
        };

        let api_key = var("PDF_QA_API_KEY")
            .or_else(|| var(provider.fallback_key_var()))
            .map(|k| k.trim().to_string())
            .unwrap_or_default();

        let max_tokens = match var("PDF_QA_MAX_TOKENS") {
            Some(v) => v.trim().parse().map_err(|_| Error::Config {
                reason: format!("PDF_QA_MAX_TOKENS must be a positive integer, got {}", v),
            })?,
            None => 1024,
        };

        let timeout = match var("PDF_QA_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().map_err(|_| Error::Config {
                reason: format!("PDF_QA_TIMEOUT_SECS must be a number of seconds, got {}", v),
            })?),
            None => Duration::from_secs(120),
        };

        let extraction = match var("PDF_QA_EXTRACTION") {
            Some(s) => s.parse()?,
            None => ExtractionStrategy::Local,
        };

        let config = Self {
            api_key,
            provider,
            endpoint: var("PDF_QA_ENDPOINT")
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            model: var("PDF_QA_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens,
            extraction,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the combination of settings is usable
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint).map_err(|e| Error::Config {
            reason: format!("Invalid endpoint {}: {}", self.endpoint, e),
        })?;

        if self.max_tokens == 0 {
            return Err(Error::Config {
                reason: "max_tokens must be greater than zero".to_string(),
            });
        }

        if self.extraction == ExtractionStrategy::Remote && self.provider != Provider::Messages {
            return Err(Error::Config {
                reason: "Remote extraction requires the messages provider".to_string(),
            });
        }

        Ok(())
    }

    /// Build the shared HTTP client
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::HttpRequest)
    }
}
