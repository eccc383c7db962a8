// src/pipeline.rs
//! Fan-out over every board, then filter, dedup, sort and cap

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::{DedupKey, FeedConfig};
use crate::filter::{CompiledRules, RecordFilter};
use crate::sources::{FetchContext, FetchError, JobSource};
use crate::types::{BoardId, JobRecord};

/// What one board produced this run.
#[derive(Debug)]
pub struct BoardReport {
    pub board: BoardId,
    pub outcome: Result<Vec<JobRecord>, FetchError>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub records: Vec<JobRecord>,
    pub fetched: usize,
    pub eligible: usize,
    pub per_board: Vec<(BoardId, usize)>,
    pub failed: Vec<(BoardId, String)>,
}

impl RunSummary {
    /// Every configured board failed; nothing trustworthy to publish.
    pub fn all_failed(&self) -> bool {
        !self.failed.is_empty() && self.per_board.is_empty()
    }
}

pub struct Pipeline {
    rules: CompiledRules,
    max_age_days: u32,
    max_results: usize,
    max_tags: usize,
    dedup_key: DedupKey,
}

impl Pipeline {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        Ok(Self {
            rules: CompiledRules::compile(&config.rules)?,
            max_age_days: config.max_age_days,
            max_results: config.max_results,
            max_tags: config.max_tags,
            dedup_key: config.dedup_key,
        })
    }

    pub async fn run(&self, sources: &[Box<dyn JobSource>], now: DateTime<Utc>) -> RunSummary {
        let ctx = FetchContext {
            now,
            max_tags: self.max_tags,
        };

        let reports = collect(sources, ctx).await;
        self.summarize(reports)
    }

    pub fn summarize(&self, reports: Vec<BoardReport>) -> RunSummary {
        let mut combined = Vec::new();
        let mut per_board = Vec::new();
        let mut failed = Vec::new();

        for report in reports {
            match report.outcome {
                Ok(records) => {
                    per_board.push((report.board, records.len()));
                    combined.extend(records);
                }
                Err(e) => failed.push((report.board, e.to_string())),
            }
        }

        let fetched = combined.len();
        let eligible = RecordFilter::new(&self.rules, self.max_age_days).apply(combined);
        let eligible_count = eligible.len();
        let records = self.finalize(eligible);

        info!(
            "Fetched {} postings, {} eligible, {} after dedup and cap",
            fetched,
            eligible_count,
            records.len()
        );

        RunSummary {
            records,
            fetched,
            eligible: eligible_count,
            per_board,
            failed,
        }
    }

    /// Dedup, sort freshest first, then cap.
    pub fn finalize(&self, records: Vec<JobRecord>) -> Vec<JobRecord> {
        let mut records = dedup(records, self.dedup_key);
        sort_by_recency(&mut records);
        cap(records, self.max_results)
    }
}

/// Fetch every board concurrently; failures become reports, never panics.
pub async fn collect(sources: &[Box<dyn JobSource>], ctx: FetchContext) -> Vec<BoardReport> {
    let fetches = sources.iter().map(|source| async move {
        let board = source.board().clone();
        let outcome = source.fetch(ctx).await;

        match &outcome {
            Ok(records) => info!(board = %board, count = records.len(), "Fetched board"),
            Err(e) => warn!(board = %board, error = %e, "Board fetch failed"),
        }

        BoardReport { board, outcome }
    });

    join_all(fetches).await
}

pub fn dedup_key(record: &JobRecord, key: DedupKey) -> String {
    match key {
        DedupKey::Url => record.url.trim().to_string(),
        DedupKey::TitleCompany => format!(
            "{}@{}",
            record.title.trim().to_lowercase(),
            record.company.trim().to_lowercase()
        ),
    }
}

/// First occurrence wins.
pub fn dedup(records: Vec<JobRecord>, key: DedupKey) -> Vec<JobRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record, key)))
        .collect()
}

/// Stable: equal ages keep their input order.
pub fn sort_by_recency(records: &mut [JobRecord]) {
    records.sort_by_key(|record| record.posted_age_days);
}

pub fn cap(mut records: Vec<JobRecord>, max: usize) -> Vec<JobRecord> {
    records.truncate(max);
    records
}
