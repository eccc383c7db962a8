// src/sources/greenhouse.rs
use async_trait::async_trait;
use serde::Deserialize;

use super::common::{age_from_text, build_tags, first_present, salary_or_placeholder};
use super::{FetchContext, FetchError, HttpFetcher, JobSource};
use crate::types::{BoardId, BoardKind, JobRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct GreenhouseResponse {
    #[serde(default)]
    pub jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GreenhouseJob {
    pub title: Option<String>,
    pub absolute_url: Option<String>,
    pub location: Option<NamedField>,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
    pub first_published: Option<String>,
    pub company: Option<NamedField>,
    pub company_name: Option<String>,
    #[serde(default)]
    pub departments: Vec<NamedField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedField {
    pub name: Option<String>,
}

pub struct GreenhouseSource {
    board: BoardId,
    fetcher: HttpFetcher,
    base_url: String,
}

impl GreenhouseSource {
    pub fn new(board: BoardId, fetcher: HttpFetcher, base_url: &str) -> Self {
        Self {
            board,
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/boards/{}/jobs", self.base_url, self.board.slug)
    }
}

#[async_trait]
impl JobSource for GreenhouseSource {
    fn board(&self) -> &BoardId {
        &self.board
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<Vec<JobRecord>, FetchError> {
        let payload: GreenhouseResponse = self
            .fetcher
            .get_json(&self.endpoint(), &[("content", "true".to_string())])
            .await?;

        Ok(normalize(&self.board, payload, ctx))
    }
}

pub(crate) fn normalize(
    board: &BoardId,
    payload: GreenhouseResponse,
    ctx: FetchContext,
) -> Vec<JobRecord> {
    payload
        .jobs
        .into_iter()
        .map(|job| {
            let title = first_present([job.title.as_deref()]).unwrap_or_default();
            let company = first_present([
                job.company.as_ref().and_then(|c| c.name.as_deref()),
                job.company_name.as_deref(),
            ])
            .unwrap_or_else(|| board.display_name());
            let posted = job
                .updated_at
                .as_deref()
                .or(job.created_at.as_deref())
                .or(job.first_published.as_deref());
            let departments = job.departments.into_iter().filter_map(|d| d.name);

            JobRecord {
                tags: build_tags(&title, departments, ctx.max_tags),
                title,
                company,
                location: first_present([job.location.as_ref().and_then(|l| l.name.as_deref())])
                    .unwrap_or_default(),
                posted_age_days: age_from_text(posted, ctx.now),
                salary: salary_or_placeholder(None),
                url: first_present([job.absolute_url.as_deref()]).unwrap_or_default(),
                source: Some(BoardKind::Greenhouse),
            }
        })
        .collect()
}
