use std::sync::Arc;

use clap::ValueEnum;
use ni_core::{ArticleExtractor, Result};

use crate::fetch::{FetchSettings, PageFetcher};

pub mod heuristic;
pub mod jsonld;
pub mod structured;

pub use heuristic::HeuristicExtractor;
pub use structured::StructuredExtractor;

/// Which extractor the pipeline is composed with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractionStrategy {
    /// `<h1>`, meta description and `<article>` fields
    Structured,
    /// Authors, publish date and main body text
    #[default]
    Heuristic,
}

pub fn create_extractor(
    strategy: ExtractionStrategy,
    settings: &FetchSettings,
) -> Result<Arc<dyn ArticleExtractor>> {
    let fetcher = PageFetcher::new(settings)?;
    let extractor: Arc<dyn ArticleExtractor> = match strategy {
        ExtractionStrategy::Structured => Arc::new(StructuredExtractor::new(fetcher)),
        ExtractionStrategy::Heuristic => Arc::new(HeuristicExtractor::new(fetcher)),
    };
    Ok(extractor)
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use ni_core::{Error, Result};
    use scraper::{ElementRef, Html, Selector};

    pub fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| Error::Extraction(format!("Invalid selector {}: {}", css, e)))
    }

    /// Collapses runs of whitespace into single spaces
    pub fn clean_text(raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn element_text(element: &ElementRef) -> String {
        clean_text(&element.text().collect::<Vec<_>>().join(" "))
    }

    pub fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
        let selector = selector(css)?;
        Ok(document
            .select(&selector)
            .next()
            .map(|el| element_text(&el)))
    }

    pub fn meta_content(document: &Html, css: &str) -> Result<Option<String>> {
        let selector = selector(css)?;
        Ok(document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .map(clean_text)
            .find(|content| !content.is_empty()))
    }
}
