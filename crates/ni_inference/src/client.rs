use async_trait::async_trait;
use ni_core::{InferenceModel, Result};
use tracing::{debug, info};

use crate::prompt::PromptBuilder;
use crate::providers::ProviderRegistry;

/// Prompt builder plus provider table: one blocking completion per call,
/// no retries and no caching.
#[derive(Debug)]
pub struct LlmClient {
    prompts: PromptBuilder,
    providers: ProviderRegistry,
}

impl LlmClient {
    pub fn new(prompts: PromptBuilder, providers: ProviderRegistry) -> Self {
        Self { prompts, providers }
    }
}

#[async_trait]
impl InferenceModel for LlmClient {
    fn name(&self) -> &str {
        "llm-client"
    }

    async fn generate(&self, text: &str, prompt_type: &str, model: &str) -> Result<String> {
        let provider = self.providers.resolve(model)?;
        let prompt = self.prompts.build(text, prompt_type).await?;

        info!("Generating response with {} via {}", model, provider.name());
        let response = provider.complete(model, &prompt).await?;
        info!("Response generated ({} chars)", response.len());
        debug!("Model response: {}", response);
        Ok(response)
    }
}
