use std::fmt;
use std::sync::Arc;

use ni_core::{
    AnalysisResult, ArticleExtractor, ArticleUrl, Error, ImpactReport, InferenceModel, Result,
    NEWS_PROMPT,
};
use tracing::{error, info, instrument};

/// Extract, then ask the model. Either both stages succeed or the caller
/// gets the error of the stage that failed.
pub struct ImpactAnalyzer {
    extractor: Arc<dyn ArticleExtractor>,
    model: Arc<dyn InferenceModel>,
}

impl fmt::Debug for ImpactAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpactAnalyzer")
            .field("extractor", &self.extractor.name())
            .field("model", &self.model.name())
            .finish()
    }
}

impl ImpactAnalyzer {
    pub fn new(extractor: Arc<dyn ArticleExtractor>, model: Arc<dyn InferenceModel>) -> Self {
        Self { extractor, model }
    }

    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn analyze(&self, url: &ArticleUrl, model: &str) -> Result<ImpactReport> {
        let result = self.run(url, model).await;
        if let Err(e) = &result {
            error!("Error analyzing news impact: {:?}", e);
        }
        result
    }

    /// Same as [`analyze`](Self::analyze), folded into the wire record
    pub async fn analyze_record(&self, url: &ArticleUrl, model: &str) -> AnalysisResult {
        self.analyze(url, model).await.into()
    }

    async fn run(&self, url: &ArticleUrl, model: &str) -> Result<ImpactReport> {
        info!("Extracting article data with the {} extractor", self.extractor.name());
        let article = self.extractor.extract(url).await?;
        if article.is_empty() {
            return Err(Error::EmptyArticle);
        }

        info!("Generating impact analysis using {}", model);
        let impact_analysis = self
            .model
            .generate(&article.as_prompt_text(), NEWS_PROMPT, model)
            .await?;

        info!("Successfully analyzed impact for article");
        Ok(ImpactReport { article, impact_analysis })
    }
}
