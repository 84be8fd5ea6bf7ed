use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::v2ex::Topic;

/// Topics restored from disk together with the time they were saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTopics {
    pub timestamp: DateTime<Local>,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Default, Clone)]
pub struct Options {
    pub path: Option<PathBuf>,
}

/// JSON file holding the last fetched topic index.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(opts: Options) -> Result<Self> {
        let path = if let Some(path) = opts.path {
            path
        } else {
            default_path().context("storage: resolve default path")?
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<CachedTopics>, CacheError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let cached = serde_json::from_str(&data).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(cached))
    }

    pub fn save(&self, topics: &[Topic], timestamp: DateTime<Local>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                    action: "create directory for",
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let document = CachedTopics {
            timestamp,
            topics: topics.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&document).map_err(CacheError::Encode)?;
        fs::write(&self.path, contents).map_err(|source| CacheError::Io {
            action: "write",
            path: self.path.clone(),
            source,
        })
    }

    pub fn invalidate(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io {
                action: "remove",
                path: self.path.clone(),
                source,
            }),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("v2ex-cli").join("topics.json"))
}
