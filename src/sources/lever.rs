// src/sources/lever.rs
use async_trait::async_trait;
use serde::Deserialize;

use super::common::{age_from_millis, build_tags, first_present, salary_or_placeholder};
use super::{FetchContext, FetchError, HttpFetcher, JobSource};
use crate::types::{BoardId, BoardKind, JobRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeverPosting {
    pub text: Option<String>,
    pub title: Option<String>,
    pub hosted_url: Option<String>,
    pub apply_url: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<i64>,
    pub categories: Option<LeverCategories>,
    /// Free-form; boards put plain text or structured data here.
    pub salary: Option<serde_json::Value>,
    pub salary_range: Option<SalaryRange>,
    pub workplace_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeverCategories {
    pub location: Option<String>,
    #[serde(default)]
    pub all_locations: Vec<String>,
    pub team: Option<String>,
    pub commitment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

impl SalaryRange {
    fn render(&self) -> Option<String> {
        let amount = match (self.min, self.max) {
            (Some(min), Some(max)) if min < max => format!("{}–{}", min as u64, max as u64),
            (Some(min), _) => format!("{}", min as u64),
            (None, Some(max)) => format!("{}", max as u64),
            (None, None) => return None,
        };

        let mut rendered = match &self.currency {
            Some(currency) => format!("{} {}", currency, amount),
            None => amount,
        };
        if let Some(interval) = &self.interval {
            rendered.push_str(&format!(" / {}", interval.replace('-', " ")));
        }
        Some(rendered)
    }
}

pub struct LeverSource {
    board: BoardId,
    fetcher: HttpFetcher,
    base_url: String,
}

impl LeverSource {
    pub fn new(board: BoardId, fetcher: HttpFetcher, base_url: &str) -> Self {
        Self {
            board,
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v0/postings/{}", self.base_url, self.board.slug)
    }
}

#[async_trait]
impl JobSource for LeverSource {
    fn board(&self) -> &BoardId {
        &self.board
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<Vec<JobRecord>, FetchError> {
        let payload: Vec<LeverPosting> = self
            .fetcher
            .get_json(&self.endpoint(), &[("mode", "json".to_string())])
            .await?;

        Ok(normalize(&self.board, payload, ctx))
    }
}

/// Lever postings carry no company name; the board's display name stands in.
pub(crate) fn normalize(board: &BoardId, payload: Vec<LeverPosting>, ctx: FetchContext) -> Vec<JobRecord> {
    payload
        .into_iter()
        .map(|posting| {
            let title =
                first_present([posting.text.as_deref(), posting.title.as_deref()]).unwrap_or_default();
            let location = posting
                .categories
                .as_ref()
                .and_then(|c| {
                    first_present([c.location.as_deref()]).or_else(|| {
                        let all = c
                            .all_locations
                            .iter()
                            .filter_map(|l| first_present([Some(l.as_str())]))
                            .collect::<Vec<_>>();
                        (!all.is_empty()).then(|| all.join("; "))
                    })
                })
                .unwrap_or_default();
            let salary = posting
                .salary
                .as_ref()
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .or_else(|| posting.salary_range.as_ref().and_then(SalaryRange::render));

            let labels: Vec<String> = [
                posting.workplace_type.as_deref().map(workplace_label),
                posting.categories.as_ref().and_then(|c| c.commitment.clone()),
                posting.categories.as_ref().and_then(|c| c.team.clone()),
            ]
            .into_iter()
            .flatten()
            .collect();

            JobRecord {
                tags: build_tags(&title, labels, ctx.max_tags),
                title,
                company: board.display_name(),
                location,
                posted_age_days: age_from_millis(posting.created_at, ctx.now),
                salary: salary_or_placeholder(salary),
                url: first_present([
                    posting.hosted_url.as_deref(),
                    posting.apply_url.as_deref(),
                    posting.url.as_deref(),
                ])
                .unwrap_or_default(),
                source: Some(BoardKind::Lever),
            }
        })
        .collect()
}

fn workplace_label(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "remote" => "Remote".to_string(),
        "hybrid" => "Hybrid".to_string(),
        "onsite" | "on-site" => "On-site".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> FetchContext {
        FetchContext {
            now: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            max_tags: 4,
        }
    }

    #[test]
    fn test_normalize_lever_posting() {
        let created = Utc
            .with_ymd_and_hms(2024, 3, 10, 8, 0, 0)
            .unwrap()
            .timestamp_millis();
        let payload: Vec<LeverPosting> = serde_json::from_value(serde_json::json!([
            {
                "id": "abc",
                "text": "Treasury Analyst",
                "hostedUrl": "https://jobs.lever.co/brex/abc",
                "applyUrl": "https://jobs.lever.co/brex/abc/apply",
                "createdAt": created,
                "workplaceType": "hybrid",
                "categories": {
                    "location": "San Francisco, CA",
                    "team": "Finance",
                    "commitment": "Full-time"
                },
                "salaryRange": {
                    "min": 95000.0,
                    "max": 120000.0,
                    "currency": "USD",
                    "interval": "per-year-salary"
                }
            }
        ]))
        .unwrap();

        let board = BoardId::new(BoardKind::Lever, "brex").with_name("Brex");
        let jobs = normalize(&board, payload, ctx());

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.title, "Treasury Analyst");
        assert_eq!(job.company, "Brex");
        assert_eq!(job.location, "San Francisco, CA");
        assert_eq!(job.posted_age_days, 5);
        assert_eq!(job.url, "https://jobs.lever.co/brex/abc");
        assert_eq!(job.salary, "USD 95000–120000 / per year salary");
        assert_eq!(job.tags, vec!["Hybrid", "Full-time", "Finance"]);
    }

    #[test]
    fn test_location_and_url_fallbacks() {
        let payload: Vec<LeverPosting> = serde_json::from_value(serde_json::json!([
            {
                "title": "Revenue Analyst",
                "applyUrl": "https://jobs.lever.co/notion/x/apply",
                "categories": { "allLocations": ["Remote US", " "] }
            }
        ]))
        .unwrap();

        let board = BoardId::new(BoardKind::Lever, "notion");
        let jobs = normalize(&board, payload, ctx());

        assert_eq!(jobs[0].title, "Revenue Analyst");
        assert_eq!(jobs[0].company, "Notion");
        assert_eq!(jobs[0].location, "Remote US");
        assert_eq!(jobs[0].url, "https://jobs.lever.co/notion/x/apply");
        assert_eq!(jobs[0].salary, crate::types::SALARY_PLACEHOLDER);
    }

    #[test]
    fn test_html_additional_text_does_not_break_decoding() {
        let body = r#"[
  {
    "id": "d1e2",
    "text": "Strategic Finance Associate",
    "additional": "<div>Benefits include equity and 401(k).</div>",
    "additionalPlain": "Benefits include equity and 401(k).",
    "description": "<div>About the role</div>",
    "descriptionPlain": "About the role",
    "lists": [{ "text": "Requirements", "content": "<li>SQL</li>" }],
    "hostedUrl": "https://jobs.lever.co/robinhood/d1e2",
    "createdAt": 1710288000000,
    "workplaceType": "onsite",
    "categories": {
      "commitment": "Full-time",
      "department": "Finance",
      "team": "FP&A",
      "allLocations": ["Menlo Park, CA", "New York, NY"]
    }
  },
  {
    "id": "f3g4",
    "text": "Treasury Analyst",
    "additional": "",
    "hostedUrl": "https://jobs.lever.co/robinhood/f3g4",
    "categories": { "location": "Denver, CO", "allLocations": ["Denver, CO"] }
  }
]"#;

        let payload: Vec<LeverPosting> = serde_json::from_str(body).unwrap();
        let board = BoardId::new(BoardKind::Lever, "robinhood").with_name("Robinhood");
        let jobs = normalize(&board, payload, ctx());

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].location, "Menlo Park, CA; New York, NY");
        assert_eq!(jobs[0].company, "Robinhood");
        assert_eq!(jobs[0].posted_age_days, 2);
        assert_eq!(
            jobs[0].tags,
            vec!["Early-career", "On-site", "Full-time", "FP&A"]
        );
        assert_eq!(jobs[1].location, "Denver, CO");
    }
}
