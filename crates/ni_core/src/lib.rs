pub mod error;
pub mod extract;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use extract::ArticleExtractor;
pub use models::InferenceModel;
pub use types::{
    AnalysisRequest, AnalysisResult, ArticleContent, ArticleUrl, ImpactReport, StructuredArticle,
    DEFAULT_MODEL, NEWS_PROMPT,
};
