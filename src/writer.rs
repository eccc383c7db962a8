// src/writer.rs
//! Serializes the final list to the feed file

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::{OutputConfig, OutputShape};
use crate::fs_ops::FsOps;
use crate::types::{FeedDocument, JobRecord};

pub struct FeedWriter {
    output: OutputConfig,
    placeholder: Vec<JobRecord>,
}

impl FeedWriter {
    pub fn new(output: OutputConfig, placeholder: Option<Vec<JobRecord>>) -> Self {
        Self {
            output,
            placeholder: placeholder.unwrap_or_default(),
        }
    }

    /// Pretty-printed JSON in the configured shape.
    pub fn render(&self, records: &[JobRecord], now: DateTime<Utc>) -> Result<String> {
        let mut rendered = match self.output.shape {
            OutputShape::Bare => {
                serde_json::to_string_pretty(records).context("Failed to serialize jobs")?
            }
            OutputShape::Wrapped => {
                let document = FeedDocument {
                    updated_at: now,
                    key: self.output.key.clone(),
                    jobs: records.to_vec(),
                };
                let value = document
                    .to_value()
                    .context("Failed to serialize feed document")?;
                serde_json::to_string_pretty(&value).context("Failed to serialize feed document")?
            }
        };
        rendered.push('\n');
        Ok(rendered)
    }

    pub async fn write(&self, records: &[JobRecord], now: DateTime<Utc>) -> Result<()> {
        let content = self.render(records, now)?;
        FsOps::write_atomic(&self.output.path, &content).await?;
        info!(
            "Wrote {} jobs to {}",
            records.len(),
            self.output.path.display()
        );
        Ok(())
    }

    pub async fn write_placeholder(&self, now: DateTime<Utc>) -> Result<()> {
        warn!(
            "Writing placeholder feed ({} records) to {}",
            self.placeholder.len(),
            self.output.path.display()
        );
        let content = self.render(&self.placeholder, now)?;
        FsOps::write_atomic(&self.output.path, &content).await
    }

    /// Write `records`; if that fails, fall back to the placeholder set.
    ///
    /// Returns `Ok(true)` when the real records were written.
    pub async fn write_or_fallback(&self, records: &[JobRecord], now: DateTime<Utc>) -> Result<bool> {
        match self.write(records, now).await {
            Ok(()) => Ok(true),
            Err(e) => {
                error!("Failed to write feed: {:#}", e);
                self.write_placeholder(now)
                    .await
                    .context("Failed to write placeholder feed")?;
                Ok(false)
            }
        }
    }
}
