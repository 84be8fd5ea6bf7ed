use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected element missing from page: {0}")]
    MissingElement(&'static str),
}

/// What a topic source can fail with: the page could not be fetched, or it
/// did not look like a V2EX page.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid topic number: {0}")]
    InvalidTopicNumber(String),
    #[error("Unknown command {0:?}. Use h for help.")]
    UnknownCommand(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache: {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache: malformed document {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cache: encode topics: {0}")]
    Encode(#[source] serde_json::Error),
}
