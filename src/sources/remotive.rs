// src/sources/remotive.rs
use async_trait::async_trait;
use serde::Deserialize;

use super::common::{age_from_text, build_tags, first_present, salary_or_placeholder};
use super::{FetchContext, FetchError, HttpFetcher, JobSource};
use crate::types::{BoardId, BoardKind, JobRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct RemotiveResponse {
    #[serde(default)]
    pub jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemotiveJob {
    pub url: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub candidate_required_location: Option<String>,
    pub publication_date: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Remote-only board; `slug` is the Remotive category.
pub struct RemotiveSource {
    board: BoardId,
    fetcher: HttpFetcher,
    base_url: String,
}

impl RemotiveSource {
    pub fn new(board: BoardId, fetcher: HttpFetcher, base_url: &str) -> Self {
        Self {
            board,
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl JobSource for RemotiveSource {
    fn board(&self) -> &BoardId {
        &self.board
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<Vec<JobRecord>, FetchError> {
        let url = format!("{}/api/remote-jobs", self.base_url);
        let payload: RemotiveResponse = self
            .fetcher
            .get_json(&url, &[("category", self.board.slug.clone())])
            .await?;

        Ok(normalize(&self.board, payload, ctx))
    }
}

pub(crate) fn normalize(board: &BoardId, payload: RemotiveResponse, ctx: FetchContext) -> Vec<JobRecord> {
    payload
        .jobs
        .into_iter()
        .map(|job| {
            let title = first_present([job.title.as_deref()]).unwrap_or_default();

            // Every Remotive posting is remote; keep the marker so the
            // geography rules see it even when the region text is narrower.
            let location = match first_present([job.candidate_required_location.as_deref()]) {
                Some(region) if region.to_lowercase().contains("remote") => region,
                Some(region) => format!("Remote ({})", region),
                None => "Remote".to_string(),
            };

            let labels = std::iter::once("Remote".to_string())
                .chain(job.job_type.map(|t| t.replace('_', "-")))
                .chain(job.tags);

            JobRecord {
                tags: build_tags(&title, labels, ctx.max_tags),
                title,
                company: first_present([job.company_name.as_deref()])
                    .unwrap_or_else(|| board.display_name()),
                location,
                posted_age_days: age_from_text(job.publication_date.as_deref(), ctx.now),
                salary: salary_or_placeholder(job.salary),
                url: first_present([job.url.as_deref()]).unwrap_or_default(),
                source: Some(BoardKind::Remotive),
            }
        })
        .collect()
}
