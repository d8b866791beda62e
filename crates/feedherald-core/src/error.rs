use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors raised while fetching or parsing a source feed.
    /// These abandon the tick for that source only.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::FeedParse(_))
    }
}
