// src/sources/mod.rs
//! One adapter per job board, all producing `JobRecord`s

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::FeedConfig;
use crate::types::{BoardId, BoardKind, JobRecord};

pub mod common;
pub mod greenhouse;
pub mod http;
pub mod lever;
pub mod muse;
pub mod remotive;

pub use greenhouse::GreenhouseSource;
pub use http::HttpFetcher;
pub use lever::LeverSource;
pub use muse::MuseSource;
pub use remotive::RemotiveSource;

/// Why a board produced nothing this run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed payload from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Values shared by every adapter during one run.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext {
    pub now: DateTime<Utc>,
    pub max_tags: usize,
}

#[async_trait]
pub trait JobSource: Send + Sync {
    fn board(&self) -> &BoardId;

    async fn fetch(&self, ctx: FetchContext) -> Result<Vec<JobRecord>, FetchError>;
}

/// Build one adapter per allow-listed board.
pub fn sources_for(config: &FeedConfig, fetcher: &HttpFetcher) -> Vec<Box<dyn JobSource>> {
    config
        .boards
        .iter()
        .map(|board| -> Box<dyn JobSource> {
            let board = board.clone();
            match board.kind {
                BoardKind::Greenhouse => Box::new(GreenhouseSource::new(
                    board,
                    fetcher.clone(),
                    &config.base_urls.greenhouse,
                )),
                BoardKind::Lever => Box::new(LeverSource::new(
                    board,
                    fetcher.clone(),
                    &config.base_urls.lever,
                )),
                BoardKind::Remotive => Box::new(RemotiveSource::new(
                    board,
                    fetcher.clone(),
                    &config.base_urls.remotive,
                )),
                BoardKind::Muse => Box::new(MuseSource::new(
                    board,
                    fetcher.clone(),
                    &config.base_urls.muse,
                    config.http.muse_max_pages,
                )),
            }
        })
        .collect()
}
