pub mod fetch;
pub mod scrapers;

pub use fetch::{FetchSettings, PageFetcher};
pub use scrapers::{create_extractor, ExtractionStrategy, HeuristicExtractor, StructuredExtractor};

pub mod prelude {
    pub use super::scrapers::{create_extractor, ExtractionStrategy};
    pub use ni_core::{ArticleContent, ArticleExtractor, ArticleUrl, Error, Result};
}
