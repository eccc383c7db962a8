// src/reader.rs
//! Reads a feed file the way the site consumes it: bare array or wrapped object

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use crate::fs_ops::FsOps;
use crate::types::JobRecord;

#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub updated_at: Option<String>,
    pub jobs: Vec<JobRecord>,
}

/// Name of the job array in a wrapped feed when none is configured.
pub const DEFAULT_FEED_KEY: &str = "jobs";

pub async fn read_feed(path: &Path, key: &str) -> Result<FeedSnapshot> {
    let content = FsOps::read_file_safe(path).await?;
    parse_feed(&content, key).with_context(|| format!("Malformed feed file: {}", path.display()))
}

/// `key` names the array inside a wrapped feed; when it is absent the first array is used.
pub fn parse_feed(content: &str, key: &str) -> Result<FeedSnapshot> {
    let value: Value = serde_json::from_str(content).context("Feed is not valid JSON")?;

    match value {
        Value::Array(_) => Ok(FeedSnapshot {
            updated_at: None,
            jobs: serde_json::from_value(value).context("Feed array holds invalid records")?,
        }),
        Value::Object(mut map) => {
            let updated_at = map
                .remove("updated_at")
                .and_then(|v| v.as_str().map(|s| s.to_string()));

            let jobs = match map.remove(key) {
                Some(jobs) if jobs.is_array() => jobs,
                Some(_) => anyhow::bail!("Wrapped feed field '{}' is not an array", key),
                None => map
                    .into_iter()
                    .find(|(_, v)| v.is_array())
                    .map(|(_, v)| v)
                    .ok_or_else(|| anyhow::anyhow!("Wrapped feed has no job array"))?,
            };

            Ok(FeedSnapshot {
                updated_at,
                jobs: serde_json::from_value(jobs).context("Feed array holds invalid records")?,
            })
        }
        _ => anyhow::bail!("Feed must be an array or an object"),
    }
}
