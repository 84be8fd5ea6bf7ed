use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use url::Url;

use crate::error::{CacheError, SourceError};
use crate::extract;
use crate::storage::{CachedTopics, Store};
use crate::v2ex::{self, Topic, TopicDetail};

/// Where topics and topic pages come from.
pub trait TopicSource {
    fn load_topics(&self) -> Result<Vec<Topic>, SourceError>;
    fn load_topic(&self, topic: &Topic) -> Result<TopicDetail, SourceError>;
}

/// Persistence for the topic index between runs.
pub trait TopicCache {
    fn load(&self) -> Result<Option<CachedTopics>, CacheError>;
    fn save(&self, topics: &[Topic], timestamp: DateTime<Local>) -> Result<(), CacheError>;
    fn invalidate(&self) -> Result<(), CacheError>;
}

pub struct V2exTopicSource {
    client: v2ex::Client,
    base: Url,
}

impl V2exTopicSource {
    pub fn new(client: v2ex::Client) -> Result<Self> {
        let base = Url::parse(client.base_url())
            .with_context(|| format!("parse site base url {:?}", client.base_url()))?;
        Ok(Self { client, base })
    }
}

impl TopicSource for V2exTopicSource {
    fn load_topics(&self) -> Result<Vec<Topic>, SourceError> {
        let markup = self.client.fetch_index()?;
        let topics = extract::extract_topics(&markup, &self.base);
        tracing::info!(count = topics.len(), "loaded topic index");
        Ok(topics)
    }

    fn load_topic(&self, topic: &Topic) -> Result<TopicDetail, SourceError> {
        let markup = self.client.fetch(&topic.url)?;
        let detail = extract::extract_topic_detail(&markup)?;
        tracing::info!(url = %topic.url, comments = detail.comments.len(), "loaded topic");
        Ok(detail)
    }
}

impl TopicCache for Store {
    fn load(&self) -> Result<Option<CachedTopics>, CacheError> {
        Store::load(self)
    }

    fn save(&self, topics: &[Topic], timestamp: DateTime<Local>) -> Result<(), CacheError> {
        Store::save(self, topics, timestamp)
    }

    fn invalidate(&self) -> Result<(), CacheError> {
        Store::invalidate(self)
    }
}
