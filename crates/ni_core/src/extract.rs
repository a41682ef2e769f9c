use async_trait::async_trait;
use crate::types::{ArticleContent, ArticleUrl};
use crate::Result;

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Returns the name of the extraction strategy
    fn name(&self) -> &str;

    /// Fetches the page behind `url` and pulls the article out of it
    async fn extract(&self, url: &ArticleUrl) -> Result<ArticleContent>;
}
