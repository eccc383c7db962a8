// src/filter.rs
//! Eligibility rules applied uniformly to every board's output

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::config::RuleSet;
use crate::types::JobRecord;

/// `RuleSet` with lowercased terms and compiled patterns.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    keywords: Vec<String>,
    exclude: Vec<String>,
    geo_terms: Vec<String>,
    geo_patterns: Vec<Regex>,
    match_tags: bool,
}

impl CompiledRules {
    pub fn compile(rules: &RuleSet) -> Result<Self> {
        let geo_patterns = rules
            .geography
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid pattern: {}", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            keywords: lowercase_all(&rules.keywords),
            exclude: lowercase_all(&rules.exclude),
            geo_terms: lowercase_all(&rules.geography.terms),
            geo_patterns,
            match_tags: rules.match_tags,
        })
    }

    pub fn matches_keyword(&self, record: &JobRecord) -> bool {
        let title = record.title.to_lowercase();
        if self.keywords.iter().any(|k| title.contains(k)) {
            return true;
        }

        self.match_tags
            && record.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                self.keywords.iter().any(|k| tag.contains(k))
            })
    }

    pub fn matches_geography(&self, location: &str) -> bool {
        if location.trim().is_empty() {
            return false;
        }

        let lowered = location.to_lowercase();
        self.geo_terms.iter().any(|term| lowered.contains(term))
            || self.geo_patterns.iter().any(|re| re.is_match(location))
    }

    pub fn is_excluded(&self, record: &JobRecord) -> bool {
        let text = format!("{} {}", record.company, record.title).to_lowercase();
        self.exclude.iter().any(|term| text.contains(term))
    }
}

/// Keeps only records that satisfy every eligibility predicate.
pub struct RecordFilter<'a> {
    rules: &'a CompiledRules,
    max_age_days: u32,
}

impl<'a> RecordFilter<'a> {
    pub fn new(rules: &'a CompiledRules, max_age_days: u32) -> Self {
        Self {
            rules,
            max_age_days,
        }
    }

    pub fn accepts(&self, record: &JobRecord) -> bool {
        record.has_identity()
            && record.posted_age_days <= self.max_age_days
            && self.rules.matches_keyword(record)
            && self.rules.matches_geography(&record.location)
            && !self.rules.is_excluded(record)
    }

    pub fn apply(&self, records: Vec<JobRecord>) -> Vec<JobRecord> {
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
