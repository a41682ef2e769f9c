use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Human readable name used in logs
    fn name(&self) -> &str;

    /// Render `text` into the `prompt_type` template and ask `model` for a completion.
    async fn generate(&self, text: &str, prompt_type: &str, model: &str) -> Result<String>;
}
