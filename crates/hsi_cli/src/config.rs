use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;

/// Credentials and secrets read from the environment (and `.env` if present).
#[derive(Clone, Default)]
pub struct Settings {
    pub bing_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub cron_secret: Option<String>,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            bing_api_key: optional("BING_API_KEY"),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_org_id: optional("OPENAI_ORG_ID"),
            openai_model: optional("OPENAI_MODEL"),
            cron_secret: optional("CRON_SECRET"),
        })
    }

    /// Fails early for commands that cannot do anything without search.
    pub fn require_search_key(&self) -> Result<&str> {
        self.bing_api_key
            .as_deref()
            .context("BING_API_KEY must be set")
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_deref().map(|_| "<redacted>");
        f.debug_struct("Settings")
            .field("bing_api_key", &redact(&self.bing_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_org_id", &self.openai_org_id)
            .field("openai_model", &self.openai_model)
            .field("cron_secret", &redact(&self.cron_secret))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let settings = Settings {
            bing_api_key: Some("bing-123".to_string()),
            cron_secret: Some("shh".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("bing-123"));
        assert!(!printed.contains("shh"));
        assert!(settings.require_search_key().is_ok());
        assert!(Settings::default().require_search_key().is_err());
    }
}
