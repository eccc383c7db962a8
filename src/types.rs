// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Age assigned when a board gives no usable timestamp.
pub const UNKNOWN_AGE_DAYS: u32 = 9999;

/// Rendered in place of a missing salary.
pub const SALARY_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    Greenhouse,
    Lever,
    Remotive,
    Muse,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Greenhouse => "greenhouse",
            BoardKind::Lever => "lever",
            BoardKind::Remotive => "remotive",
            BoardKind::Muse => "muse",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the board allow-list.
///
/// `slug` is the board token for Greenhouse and Lever, and the category
/// for Remotive and The Muse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardId {
    pub kind: BoardKind,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BoardId {
    pub fn new(kind: BoardKind, slug: &str) -> Self {
        Self {
            kind,
            slug: slug.to_string(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Company name used when the payload does not carry one.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => capitalize(&self.slug),
        }
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.slug)
    }
}

/// The common posting shape every adapter produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "posted_days", default = "unknown_age")]
    pub posted_age_days: u32,
    #[serde(default = "salary_placeholder")]
    pub salary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BoardKind>,
}

impl JobRecord {
    pub fn has_identity(&self) -> bool {
        !self.title.trim().is_empty() && !self.company.trim().is_empty() && !self.url.trim().is_empty()
    }
}

fn unknown_age() -> u32 {
    UNKNOWN_AGE_DAYS
}

fn salary_placeholder() -> String {
    SALARY_PLACEHOLDER.to_string()
}

/// Wrapped output shape: `{ "updated_at": ..., "<key>": [...] }`.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub updated_at: DateTime<Utc>,
    pub key: String,
    pub jobs: Vec<JobRecord>,
}

impl FeedDocument {
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut map = serde_json::Map::new();
        map.insert(
            "updated_at".to_string(),
            serde_json::Value::String(self.updated_at.to_rfc3339()),
        );
        map.insert(self.key.clone(), serde_json::to_value(&self.jobs)?);
        Ok(serde_json::Value::Object(map))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_slug() {
        let board = BoardId::new(BoardKind::Greenhouse, "stripe");
        assert_eq!(board.display_name(), "Stripe");

        let named = BoardId::new(BoardKind::Lever, "brex").with_name("Brex Inc.");
        assert_eq!(named.display_name(), "Brex Inc.");
    }

    #[test]
    fn test_record_serializes_consumer_field_names() {
        let record = JobRecord {
            title: "Financial Analyst".to_string(),
            company: "Stripe".to_string(),
            location: "New York, NY".to_string(),
            posted_age_days: 2,
            salary: SALARY_PLACEHOLDER.to_string(),
            tags: vec![],
            url: "https://example.com/1".to_string(),
            source: Some(BoardKind::Greenhouse),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["posted_days"], 2);
        assert_eq!(value["source"], "greenhouse");
        assert!(value.get("posted_age_days").is_none());
    }

    #[test]
    fn test_record_missing_optionals_get_placeholders() {
        let record: JobRecord = serde_json::from_value(serde_json::json!({
            "title": "FP&A Analyst",
            "company": "Chime",
            "url": "https://example.com/2"
        }))
        .unwrap();

        assert_eq!(record.posted_age_days, UNKNOWN_AGE_DAYS);
        assert_eq!(record.salary, SALARY_PLACEHOLDER);
        assert!(record.tags.is_empty());
        assert!(record.source.is_none());
    }
}
