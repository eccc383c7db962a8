// src/sources/common.rs
//! Field normalization shared by the board adapters

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::types::{SALARY_PLACEHOLDER, UNKNOWN_AGE_DAYS};

/// Whole days between `when` and `now`; future timestamps count as today.
pub fn days_between(when: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - when).num_days();
    if days < 0 {
        0
    } else {
        u32::try_from(days).unwrap_or(UNKNOWN_AGE_DAYS).min(UNKNOWN_AGE_DAYS)
    }
}

/// Accepts RFC 3339 and the zone-less `YYYY-MM-DDTHH:MM:SS[.f]` form (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn age_from_text(raw: Option<&str>, now: DateTime<Utc>) -> u32 {
    raw.and_then(parse_timestamp)
        .map(|when| days_between(when, now))
        .unwrap_or(UNKNOWN_AGE_DAYS)
}

pub fn age_from_millis(millis: Option<i64>, now: DateTime<Utc>) -> u32 {
    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|when| days_between(when, now))
        .unwrap_or(UNKNOWN_AGE_DAYS)
}

pub fn salary_or_placeholder(salary: Option<String>) -> String {
    match salary {
        Some(s) if !s.trim().is_empty() => clean_text(&s),
        _ => SALARY_PLACEHOLDER.to_string(),
    }
}

/// Labels inferred from the title.
pub fn derived_tags(title: &str) -> Vec<String> {
    let t = title.to_lowercase();
    let mut tags = Vec::new();
    if t.contains("junior") || t.contains("associate") {
        tags.push("Early-career".to_string());
    }
    if t.contains("remote") {
        tags.push("Remote".to_string());
    }
    if t.contains("hybrid") {
        tags.push("Hybrid".to_string());
    }
    tags
}

/// Derived tags first, then board labels; case-insensitive dedup, capped.
pub fn build_tags<I>(title: &str, board_labels: I, max_tags: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in derived_tags(title).into_iter().chain(board_labels) {
        if tags.len() >= max_tags {
            break;
        }
        let tag = clean_text(&tag);
        if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            continue;
        }
        tags.push(tag);
    }
    tags
}

/// Collapse runs of whitespace and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-blank candidate, cleaned.
pub fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(clean_text)
        .find(|s| !s.is_empty())
}
