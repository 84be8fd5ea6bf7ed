use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub const V2EX_BASE: &str = "https://www.v2ex.com";
pub const DEFAULT_LIST_PATH: &str = "/?tab=all";

/// Sites may reject default client identifiers, so requests present
/// themselves as a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const ANONYMOUS: &str = "anonymous";
pub const NO_SEQUENCE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub url: String,
    #[serde(alias = "reply")]
    pub reply_count_label: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub created_time: String,
}

impl Topic {
    pub fn is_same(&self, other: &Topic) -> bool {
        self.url == other.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub sequence_no: String,
    pub author: String,
    pub timestamp: String,
    pub content: String,
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(
        sequence_no: impl Into<String>,
        author: impl Into<String>,
        timestamp: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let sequence_no = sequence_no.into();
        let author = author.into();
        Self {
            sequence_no: if sequence_no.trim().is_empty() {
                NO_SEQUENCE.to_string()
            } else {
                sequence_no
            },
            author: if author.trim().is_empty() {
                ANONYMOUS.to_string()
            } else {
                author
            },
            timestamp: timestamp.into(),
            content: content.into(),
            replies: Vec::new(),
        }
    }
}

/// One topic page as extracted: the topic body plus its replies in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicDetail {
    pub content: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub list_path: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub http_client: Option<HttpClient>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: V2EX_BASE.to_string(),
            list_path: DEFAULT_LIST_PATH.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            http_client: None,
        }
    }
}

pub struct Client {
    http: HttpClient,
    user_agent: String,
    base_url: String,
    list_path: String,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("v2ex client user agent required");
        }

        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(config.timeout)
                .build()
                .context("build v2ex HTTP client")?,
        };

        Ok(Client {
            http,
            user_agent: config.user_agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            list_path: config.list_path,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn index_url(&self) -> String {
        if self.list_path.starts_with('/') {
            format!("{}{}", self.base_url, self.list_path)
        } else {
            format!("{}/{}", self.base_url, self.list_path)
        }
    }

    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching page");
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    pub fn fetch_index(&self) -> Result<String, FetchError> {
        self.fetch(&self.index_url())
    }
}
