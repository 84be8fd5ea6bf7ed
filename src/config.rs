use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::v2ex;

const DEFAULT_ENV_PREFIX: &str = "V2EX_CLI";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_list_path")]
    pub list_path: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_path: default_list_path(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    v2ex::V2EX_BASE.to_string()
}

fn default_list_path() -> String {
    v2ex::DEFAULT_LIST_PATH.to_string()
}

fn default_user_agent() -> String {
    v2ex::BROWSER_USER_AGENT.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagingConfig {
    #[serde(default = "default_topics_per_page")]
    pub topics_per_page: usize,
    #[serde(default = "default_comments_per_page")]
    pub comments_per_page: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            topics_per_page: default_topics_per_page(),
            comments_per_page: default_comments_per_page(),
        }
    }
}

fn default_topics_per_page() -> usize {
    12
}

fn default_comments_per_page() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CacheConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            path: None,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.site.base_url.trim().is_empty() {
        base.site.base_url = other.site.base_url;
    }
    if !other.site.list_path.trim().is_empty() {
        base.site.list_path = other.site.list_path;
    }
    if !other.site.user_agent.trim().is_empty() {
        base.site.user_agent = other.site.user_agent;
    }
    if !other.site.timeout.is_zero() {
        base.site.timeout = other.site.timeout;
    }

    if other.paging.topics_per_page != 0 {
        base.paging.topics_per_page = other.paging.topics_per_page;
    }
    if other.paging.comments_per_page != 0 {
        base.paging.comments_per_page = other.paging.comments_per_page;
    }

    if other.cache.path.is_some() {
        base.cache.path = other.cache.path;
    }

    if !other.log.level.trim().is_empty() {
        base.log.level = other.log.level;
    }
    if other.log.path.is_some() {
        base.log.path = other.log.path;
    }

    base
}

/// Applies `PREFIX_SECTION__KEY=value` variables on top of `cfg`.
fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "site.base_url" => cfg.site.base_url = value,
        "site.list_path" => cfg.site.list_path = value,
        "site.user_agent" => cfg.site.user_agent = value,
        "site.timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.site.timeout = duration;
            }
        }
        "paging.topics_per_page" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.paging.topics_per_page = parsed.max(1);
            }
        }
        "paging.comments_per_page" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.paging.comments_per_page = parsed.max(1);
            }
        }
        "cache.path" => cfg.cache.path = Some(PathBuf::from(value)),
        "log.level" => cfg.log.level = value,
        "log.path" => cfg.log.path = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("v2ex-cli").join("config.yaml"))
}
