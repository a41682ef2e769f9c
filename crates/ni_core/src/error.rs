use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to extract article data: {0}")]
    Extraction(String),

    #[error("Failed to extract article data")]
    EmptyArticle,

    #[error("Prompt template '{name}' is not available: {reason}")]
    TemplateMissing { name: String, reason: String },

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Errors caused by the request itself or by the upstream services it
    /// points at. Everything else is a fault of this service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl(_)
                | Error::Extraction(_)
                | Error::EmptyArticle
                | Error::UnsupportedModel(_)
                | Error::Provider(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
