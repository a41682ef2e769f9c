use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ni_core::{Error, Result};

use crate::Config;

pub mod openai_compat;

pub use openai_compat::OpenAiCompatibleProvider;

/// Model identifiers starting with this prefix are served through OpenRouter
pub const DEEPSEEK_PREFIX: &str = "deepseek";

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sends `prompt` as a single user message and returns the first completion
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

struct ProviderRoute {
    prefix: String,
    provider: Arc<dyn ChatProvider>,
}

/// Declared mapping from model identifier prefixes to providers.
#[derive(Default)]
pub struct ProviderRegistry {
    routes: Vec<ProviderRoute>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (&r.prefix, r.provider.name())))
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let openrouter = OpenAiCompatibleProvider::new(
            "OpenRouter",
            &config.provider_url,
            config.api_key.clone(),
            config.request_timeout,
        )?;
        Ok(Self::new().with_provider(DEEPSEEK_PREFIX, Arc::new(openrouter)))
    }

    pub fn with_provider(mut self, prefix: &str, provider: Arc<dyn ChatProvider>) -> Self {
        self.routes.push(ProviderRoute {
            prefix: prefix.to_string(),
            provider,
        });
        self
    }

    /// Longest matching prefix wins
    pub fn resolve(&self, model: &str) -> Result<Arc<dyn ChatProvider>> {
        self.routes
            .iter()
            .filter(|route| model.starts_with(route.prefix.as_str()))
            .max_by_key(|route| route.prefix.len())
            .map(|route| route.provider.clone())
            .ok_or_else(|| Error::UnsupportedModel(model.to_string()))
    }

    pub fn prefixes(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.prefix.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedProvider(&'static str);

    #[async_trait]
    impl ChatProvider for NamedProvider {
        fn name(&self) -> &str {
            self.0
        }

        async fn complete(&self, _model: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_default_table_routes_deepseek() {
        let registry = ProviderRegistry::from_config(&Config::default()).unwrap();
        assert_eq!(registry.prefixes(), vec![DEEPSEEK_PREFIX]);
        let provider = registry.resolve("deepseek/deepseek-r1:free").unwrap();
        assert_eq!(provider.name(), "OpenRouter");
    }

    #[test]
    fn test_unknown_prefix_is_an_error() {
        let registry = ProviderRegistry::from_config(&Config::default()).unwrap();
        let err = registry.resolve("openai/gpt-4o").err().unwrap();
        assert!(matches!(err, Error::UnsupportedModel(ref m) if m == "openai/gpt-4o"));
        assert!(ProviderRegistry::new().resolve("deepseek/deepseek-r1:free").is_err());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let registry = ProviderRegistry::new()
            .with_provider("deepseek", Arc::new(NamedProvider("generic")))
            .with_provider("deepseek/deepseek-r1", Arc::new(NamedProvider("reasoner")));
        assert_eq!(registry.resolve("deepseek/deepseek-r1:free").unwrap().name(), "reasoner");
        assert_eq!(registry.resolve("deepseek/deepseek-chat").unwrap().name(), "generic");
    }
}
