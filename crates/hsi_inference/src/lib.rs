use std::fmt;

pub mod models;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

#[derive(Clone)]
pub struct Config {
    /// `openai` or `dummy`
    pub provider: String,
    pub api_key: Option<String>,
    pub organization: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            organization: None,
            model_name: None,
            base_url: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("organization", &self.organization)
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use hsi_core::{CompletionRequest, Error, Result, SummarizationModel};
}

pub use models::create_model;
