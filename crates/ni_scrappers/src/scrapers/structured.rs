use async_trait::async_trait;
use ni_core::{ArticleContent, ArticleExtractor, ArticleUrl, Error, Result, StructuredArticle};
use scraper::Html;
use tracing::{info, warn};

use super::utils;
use crate::fetch::PageFetcher;

pub const NO_TITLE: &str = "No title found";
pub const NO_SUMMARY: &str = "No summary found";
pub const NO_CONTENT: &str = "No content found";

/// Reads the title, description and `<article>` body straight off the DOM.
#[derive(Debug, Clone)]
pub struct StructuredExtractor {
    fetcher: PageFetcher,
}

impl StructuredExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    pub fn parse(html: &str) -> Result<StructuredArticle> {
        let document = Html::parse_document(html);

        let title = utils::first_text(&document, "h1")?
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());
        let summary = utils::meta_content(&document, "meta[name='description']")?
            .unwrap_or_else(|| NO_SUMMARY.to_string());
        let content = utils::first_text(&document, "article")?
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_CONTENT.to_string());

        Ok(StructuredArticle { title, summary, content })
    }
}

#[async_trait]
impl ArticleExtractor for StructuredExtractor {
    fn name(&self) -> &str {
        "structured"
    }

    async fn extract(&self, url: &ArticleUrl) -> Result<ArticleContent> {
        let html = self.fetcher.fetch_html(url).await?;
        let article = Self::parse(&html)?;
        // a title and description without a body is nothing to analyze
        if article.content == NO_CONTENT {
            warn!("No <article> content found at {}", url);
            return Err(Error::EmptyArticle);
        }
        info!("Article data extracted successfully from {}", url);
        Ok(ArticleContent::Structured(article))
    }
}
