use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use ni_core::{ArticleContent, ArticleExtractor, ArticleUrl, Error, Result};
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use super::{jsonld, utils};
use crate::fetch::PageFetcher;

/// Paragraphs nested in these elements are page chrome, not article text
const BOILERPLATE: &[&str] = &["nav", "header", "footer", "aside", "form", "script", "style", "noscript"];

const AUTHOR_META: &[&str] = &["meta[name='author']", "meta[property='article:author']"];
const AUTHOR_ELEMENTS: &str = "[rel='author'], [itemprop='author'], .byline";
const MAX_AUTHOR_LEN: usize = 80;

const DATE_META: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[itemprop='datePublished']",
    "meta[name='pubdate']",
    "meta[name='publishdate']",
    "meta[name='date']",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArticle {
    pub authors: Vec<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub text: String,
}

impl ParsedArticle {
    /// Authors and date alone are not an article
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Labelled text blob handed to the model
    pub fn render(&self) -> String {
        let published = self
            .published_at
            .map(|date| date.format("%Y-%m-%d %H:%M:%S%:z").to_string())
            .unwrap_or_else(|| "None".to_string());
        let authors: Vec<String> = self.authors.iter().map(|a| quote_name(a)).collect();
        format!(
            "Article authors : [{}]\nPublished date: {}\nArticle text : {}",
            authors.join(", "),
            published,
            self.text
        )
    }
}

/// Single quotes unless the name itself holds one, e.g. `'Jane Doe'`, `"Dan O'Neil"`
fn quote_name(name: &str) -> String {
    if name.contains('\'') && !name.contains('"') {
        format!("\"{}\"", name.replace('\\', "\\\\"))
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// Full-text extraction: recovers authors, publish date and the main body
/// without relying on site specific markup.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    fetcher: PageFetcher,
}

impl HeuristicExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    pub fn parse(html: &str) -> Result<ParsedArticle> {
        let document = Html::parse_document(html);
        Ok(ParsedArticle {
            authors: extract_authors(&document)?,
            published_at: extract_publish_date(&document)?,
            text: extract_main_text(&document)?,
        })
    }
}

#[async_trait]
impl ArticleExtractor for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn extract(&self, url: &ArticleUrl) -> Result<ArticleContent> {
        let html = self.fetcher.fetch_html(url).await?;
        let article = Self::parse(&html)?;
        if article.is_empty() {
            warn!("No article text found at {}", url);
            return Err(Error::EmptyArticle);
        }
        info!(
            "Extracted {} chars of text and {} author(s) from {}",
            article.text.len(),
            article.authors.len(),
            url
        );
        Ok(ArticleContent::Text(article.render()))
    }
}

fn extract_authors(document: &Html) -> Result<Vec<String>> {
    let mut candidates = jsonld::extract_authors(document);

    for css in AUTHOR_META {
        let selector = utils::selector(css)?;
        candidates.extend(
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .filter(|content| !content.starts_with("http"))
                .map(utils::clean_text),
        );
    }

    let selector = utils::selector(AUTHOR_ELEMENTS)?;
    candidates.extend(document.select(&selector).map(|el| utils::element_text(&el)));

    let mut authors: Vec<String> = Vec::new();
    for candidate in candidates {
        let name = strip_byline(&candidate);
        if name.is_empty() || name.len() > MAX_AUTHOR_LEN {
            continue;
        }
        if !authors.iter().any(|a| a.eq_ignore_ascii_case(&name)) {
            authors.push(name);
        }
    }
    Ok(authors)
}

fn strip_byline(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => &trimmed[3..],
        _ => trimmed,
    };
    name.trim().to_string()
}

fn extract_publish_date(document: &Html) -> Result<Option<DateTime<FixedOffset>>> {
    let mut raw_dates = Vec::new();
    for css in DATE_META {
        raw_dates.extend(utils::meta_content(document, css)?);
    }
    raw_dates.extend(jsonld::extract_date_published(document));

    let selector = utils::selector("time[datetime]")?;
    raw_dates.extend(
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("datetime"))
            .map(str::to_string),
    );

    Ok(raw_dates.iter().find_map(|raw| parse_date(raw)))
}

pub(crate) fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .or_else(|| {
            raw.get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

/// Scores every paragraph's parent with its text length and its grandparent
/// with half of it, then collects the paragraphs under the best node. Ties go
/// to the node seen first.
fn extract_main_text(document: &Html) -> Result<String> {
    let selector = utils::selector("p")?;
    let mut candidates: Vec<(ElementRef, usize)> = Vec::new();
    let mut index_by_node = HashMap::new();

    for paragraph in document.select(&selector) {
        if is_boilerplate(&paragraph) {
            continue;
        }
        let score = utils::element_text(&paragraph).len();
        if score == 0 {
            continue;
        }
        let parent = paragraph.parent().and_then(ElementRef::wrap);
        let grandparent = parent.and_then(|p| p.parent()).and_then(ElementRef::wrap);

        for (node, share) in [(parent, score), (grandparent, score / 2)] {
            let Some(node) = node else {
                continue;
            };
            let index = *index_by_node.entry(node.id()).or_insert_with(|| {
                candidates.push((node, 0));
                candidates.len() - 1
            });
            candidates[index].1 += share;
        }
    }

    let mut best: Option<(ElementRef, usize)> = None;
    for &(node, score) in &candidates {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((node, score));
        }
    }

    match best {
        Some((node, score)) => {
            let paragraphs: Vec<String> = node
                .select(&selector)
                .filter(|p| !is_boilerplate(p))
                .map(|p| utils::element_text(&p))
                .filter(|text| !text.is_empty())
                .collect();
            debug!(
                "Main text block <{}> scored {} with {} paragraph(s)",
                node.value().name(),
                score,
                paragraphs.len()
            );
            Ok(paragraphs.join("\n\n"))
        }
        None => Ok(utils::first_text(document, "article")?.unwrap_or_default()),
    }
}

fn is_boilerplate(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BOILERPLATE.contains(&ancestor.value().name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html>
          <head>
            <meta property="article:published_time" content="2024-03-01T10:30:00+01:00">
            <meta name="author" content="Jane Doe">
            <script type="application/ld+json">
              {"@type": "NewsArticle", "author": [{"name": "Jane Doe"}, {"name": "John Roe"}]}
            </script>
          </head>
          <body>
            <nav><p>Home</p><p>World</p><p>Business and markets and everything else</p></nav>
            <div class="story">
              <span class="byline">By Ana Pérez</span>
              <p>Oil prices rose sharply on Monday.</p>
              <p>Analysts expect   further volatility.</p>
            </div>
            <div class="related"><p>Read more</p></div>
            <footer><p>Copyright notice that is quite long and should never be picked as the body</p></footer>
          </body>
        </html>
    "#;

    #[test]
    fn test_parse_recovers_all_fields() {
        let article = HeuristicExtractor::parse(PAGE).unwrap();
        assert_eq!(article.authors, vec!["Jane Doe", "John Roe", "Ana Pérez"]);
        assert_eq!(
            article.published_at.map(|d| d.to_rfc3339()),
            Some("2024-03-01T10:30:00+01:00".to_string())
        );
        assert_eq!(
            article.text,
            "Oil prices rose sharply on Monday.\n\nAnalysts expect further volatility."
        );
    }

    #[test]
    fn test_render_format() {
        let article = HeuristicExtractor::parse(PAGE).unwrap();
        assert_eq!(
            article.render(),
            "Article authors : ['Jane Doe', 'John Roe', 'Ana Pérez']\n\
             Published date: 2024-03-01 10:30:00+01:00\n\
             Article text : Oil prices rose sharply on Monday.\n\nAnalysts expect further volatility."
        );

        let empty = ParsedArticle {
            authors: vec![],
            published_at: None,
            text: "Sample body".to_string(),
        };
        assert_eq!(
            empty.render(),
            "Article authors : []\nPublished date: None\nArticle text : Sample body"
        );
    }

    #[test]
    fn test_quote_name() {
        assert_eq!(quote_name("Jane Doe"), "'Jane Doe'");
        assert_eq!(quote_name("Dan O'Neil"), "\"Dan O'Neil\"");
        assert_eq!(quote_name("The \"Wire\" O'Neil"), "'The \"Wire\" O\\'Neil'");
    }

    #[test]
    fn test_paragraphs_wrapped_in_their_own_divs() {
        let html = r#"
            <article>
              <div><p>First paragraph of the story is here and long.</p></div>
              <div><p>Second paragraph adds more detail to it.</p></div>
              <div><p>Third paragraph closes the story.</p></div>
            </article>
            <aside><div><p>Sidebar text that is not part of the story at all.</p></div></aside>
        "#;
        let article = HeuristicExtractor::parse(html).unwrap();
        assert_eq!(
            article.text,
            "First paragraph of the story is here and long.\n\n\
             Second paragraph adds more detail to it.\n\n\
             Third paragraph closes the story."
        );
    }

    #[test]
    fn test_page_without_body_text_is_empty() {
        let article = HeuristicExtractor::parse("<html><body><nav><p>Home</p></nav></body></html>").unwrap();
        assert!(article.is_empty());
        assert!(!HeuristicExtractor::parse(PAGE).unwrap().is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-03-01T10:30:00Z").is_some());
        assert!(parse_date("2024-03-01T10:30:00.123+02:00").is_some());
        assert!(parse_date("2024-03-01T10:30:00").is_some());
        assert_eq!(
            parse_date("2024-03-01").map(|d| d.to_rfc3339()),
            Some("2024-03-01T00:00:00+00:00".to_string())
        );
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_falls_back_to_article_text_without_paragraphs() {
        let article = HeuristicExtractor::parse("<article>Only <em>inline</em> text</article>").unwrap();
        assert!(article.authors.is_empty());
        assert_eq!(article.published_at, None);
        assert_eq!(article.text, "Only inline text");
    }

    #[test]
    fn test_url_authors_are_ignored() {
        let html = r#"<meta property="article:author" content="https://facebook.com/someone"><p>Body</p>"#;
        let article = HeuristicExtractor::parse(html).unwrap();
        assert!(article.authors.is_empty());
    }

    #[tokio::test]
    async fn test_extract_renders_text_blob() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oil"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
            .mount(&server)
            .await;

        let extractor = HeuristicExtractor::new(PageFetcher::new(&FetchSettings::default()).unwrap());
        let url = ArticleUrl::parse(&format!("{}/oil", server.uri())).unwrap();
        let content = extractor.extract(&url).await.unwrap();
        match content {
            ArticleContent::Text(text) => {
                assert!(text.starts_with("Article authors : ['Jane Doe'"));
                assert!(text.ends_with("Analysts expect further volatility."));
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_rejects_page_without_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body><nav><p>Home</p></nav></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let extractor = HeuristicExtractor::new(PageFetcher::new(&FetchSettings::default()).unwrap());
        let url = ArticleUrl::parse(&server.uri()).unwrap();
        assert!(matches!(extractor.extract(&url).await, Err(Error::EmptyArticle)));
    }

    #[tokio::test]
    async fn test_extract_wraps_fetch_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let extractor = HeuristicExtractor::new(PageFetcher::new(&FetchSettings::default()).unwrap());
        let url = ArticleUrl::parse(&server.uri()).unwrap();
        let err = extractor.extract(&url).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        assert!(err.to_string().starts_with("Failed to extract article data"));
    }
}
