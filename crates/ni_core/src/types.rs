use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
pub const NEWS_PROMPT: &str = "news";

/// Absolute `http`/`https` URL of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleUrl(Url);

impl ArticleUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("{}: scheme must be http or https", raw)));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(Error::InvalidUrl(format!("{}: missing host", raw)));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for ArticleUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ArticleUrl> for String {
    fn from(url: ArticleUrl) -> Self {
        url.0.into()
    }
}

impl FromStr for ArticleUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ArticleUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// Article as produced by one of the extraction strategies.
///
/// The structured strategy yields separate fields; the heuristic strategy
/// yields one labelled text blob. On the wire the former is an object and
/// the latter a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleContent {
    Structured(StructuredArticle),
    Text(String),
}

impl ArticleContent {
    pub fn is_empty(&self) -> bool {
        match self {
            ArticleContent::Text(text) => text.trim().is_empty(),
            ArticleContent::Structured(article) => {
                article.title.trim().is_empty()
                    && article.summary.trim().is_empty()
                    && article.content.trim().is_empty()
            }
        }
    }

    /// Text handed to the prompt builder
    pub fn as_prompt_text(&self) -> Cow<'_, str> {
        match self {
            ArticleContent::Text(text) => Cow::Borrowed(text),
            ArticleContent::Structured(article) => Cow::Owned(format!(
                "Title: {}\nSummary: {}\nContent: {}",
                article.title, article.summary, article.content
            )),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: ArticleUrl,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub article: ArticleContent,
    pub impact_analysis: String,
}

/// Wire record of one analysis. Callers tell failure apart by the `error` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Failure { error: String },
    Success(ImpactReport),
}

impl AnalysisResult {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Failure { .. })
    }
}

impl From<Result<ImpactReport>> for AnalysisResult {
    fn from(result: Result<ImpactReport>) -> Self {
        match result {
            Ok(report) => AnalysisResult::Success(report),
            Err(e) => AnalysisResult::Failure { error: e.to_string() },
        }
    }
}
