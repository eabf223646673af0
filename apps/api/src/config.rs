use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm: LlmSettings,
    /// TrueType font embedded in PDFs instead of Helvetica, for non-Latin text.
    pub pdf_font_path: Option<PathBuf>,
    pub port: u16,
}

/// Knobs for the hosted model call.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    /// Retries on 429/5xx. Zero means a failed call surfaces immediately.
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context(
                "ANTHROPIC_API_KEY is not set. ResumeCraft needs an API key to generate resumes; \
                 add it to the environment or a .env file and restart",
            )?;

        let temperature = match lookup("LLM_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .context("LLM_TEMPERATURE must be a number")?,
            None => DEFAULT_TEMPERATURE,
        };
        if !(0.0..=1.0).contains(&temperature) {
            bail!("LLM_TEMPERATURE must be between 0.0 and 1.0, got {temperature}");
        }

        let max_retries = match lookup("LLM_MAX_RETRIES") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            None => 0,
        };

        Ok(Config {
            anthropic_api_key,
            llm: LlmSettings {
                api_url: lookup("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
                model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                temperature,
                max_retries,
            },
            pdf_font_path: lookup("PDF_FONT_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }
}
