use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ni_core::{InferenceModel, Result};

pub mod analyzer;
pub mod client;
pub mod prompt;
pub mod providers;

pub use analyzer::ImpactAnalyzer;
pub use client::LlmClient;
pub use prompt::PromptBuilder;
pub use providers::{ChatProvider, OpenAiCompatibleProvider, ProviderRegistry};

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub provider_url: String,
    pub template_dir: PathBuf,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("provider_url", &self.provider_url)
            .field("template_dir", &self.template_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            provider_url: OPENROUTER_URL.to_string(),
            template_dir: PathBuf::from("prompts"),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Builds the LLM client with the default provider table
pub fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    let providers = ProviderRegistry::from_config(config)?;
    let prompts = PromptBuilder::new(&config.template_dir);
    Ok(Arc::new(LlmClient::new(prompts, providers)))
}

pub mod prelude {
    pub use super::{create_model, Config, ImpactAnalyzer};
    pub use ni_core::{AnalysisResult, Error, ImpactReport, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config {
            api_key: Some("sk-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_create_model() {
        let model = create_model(&Config::default()).unwrap();
        assert_eq!(model.name(), "llm-client");
    }
}
