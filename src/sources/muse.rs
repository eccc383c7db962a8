// src/sources/muse.rs
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::common::{age_from_text, build_tags, first_present, salary_or_placeholder};
use super::{FetchContext, FetchError, HttpFetcher, JobSource};
use crate::types::{BoardId, BoardKind, JobRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct MusePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub results: Vec<MuseJob>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MuseJob {
    pub name: Option<String>,
    pub publication_date: Option<String>,
    pub company: Option<MuseNamed>,
    pub refs: Option<MuseRefs>,
    #[serde(default)]
    pub locations: Vec<MuseNamed>,
    #[serde(default)]
    pub levels: Vec<MuseNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MuseNamed {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MuseRefs {
    pub landing_page: Option<String>,
}

/// Paginated board; `slug` is The Muse category.
pub struct MuseSource {
    board: BoardId,
    fetcher: HttpFetcher,
    base_url: String,
    max_pages: u32,
}

impl MuseSource {
    pub fn new(board: BoardId, fetcher: HttpFetcher, base_url: &str, max_pages: u32) -> Self {
        Self {
            board,
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_pages: max_pages.max(1),
        }
    }
}

#[async_trait]
impl JobSource for MuseSource {
    fn board(&self) -> &BoardId {
        &self.board
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<Vec<JobRecord>, FetchError> {
        let url = format!("{}/api/public/jobs", self.base_url);
        let mut records = Vec::new();
        let mut page = 0;

        loop {
            let payload: MusePage = self
                .fetcher
                .get_json(
                    &url,
                    &[
                        ("category", self.board.slug.clone()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let page_count = payload.page_count;
            debug!(
                "{}: page {} of {} ({} results)",
                self.board,
                payload.page,
                page_count,
                payload.results.len()
            );
            records.extend(normalize(&self.board, payload, ctx));

            page += 1;
            if page >= page_count || page >= self.max_pages {
                break;
            }
        }

        Ok(records)
    }
}

pub(crate) fn normalize(board: &BoardId, payload: MusePage, ctx: FetchContext) -> Vec<JobRecord> {
    payload
        .results
        .into_iter()
        .map(|job| {
            let title = first_present([job.name.as_deref()]).unwrap_or_default();
            let location = job
                .locations
                .iter()
                .filter_map(|l| first_present([l.name.as_deref()]))
                .collect::<Vec<_>>()
                .join("; ");
            let levels = job.levels.into_iter().filter_map(|l| l.name);

            JobRecord {
                tags: build_tags(&title, levels, ctx.max_tags),
                title,
                company: first_present([job.company.as_ref().and_then(|c| c.name.as_deref())])
                    .unwrap_or_else(|| board.display_name()),
                location,
                posted_age_days: age_from_text(job.publication_date.as_deref(), ctx.now),
                salary: salary_or_placeholder(None),
                url: first_present([job.refs.as_ref().and_then(|r| r.landing_page.as_deref())])
                    .unwrap_or_default(),
                source: Some(BoardKind::Muse),
            }
        })
        .collect()
}
