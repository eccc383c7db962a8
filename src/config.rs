// src/config.rs
//! Run configuration: board allow-list, filter rules and output policy

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{BoardId, BoardKind, JobRecord};

const DEFAULT_CONFIG_FILE: &str = "jobfeed.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub boards: Vec<BoardId>,
    pub rules: RuleSet,
    pub max_age_days: u32,
    pub max_results: usize,
    pub max_tags: usize,
    pub dedup_key: DedupKey,
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub base_urls: BaseUrls,
    pub placeholder: Option<Vec<JobRecord>>,
}

/// Match patterns as data; compiled once by `filter::CompiledRules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSet {
    pub keywords: Vec<String>,
    pub exclude: Vec<String>,
    pub geography: GeographyRules,
    /// Also test board/derived tags against `keywords`, not just the title.
    pub match_tags: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeographyRules {
    pub terms: Vec<String>,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    Url,
    TitleCompany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    Bare,
    Wrapped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub shape: OutputShape,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub muse_max_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseUrls {
    pub greenhouse: String,
    pub lever: String,
    pub remotive: String,
    pub muse: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let greenhouse = [
            "doordash", "stripe", "snowflake", "chime", "airbnb", "datadog", "asana", "etsy",
            "affirm",
        ];
        let lever = ["notion", "benchling", "robinhood", "reddit", "brex", "dropbox"];

        let mut boards: Vec<BoardId> = greenhouse
            .iter()
            .map(|slug| BoardId::new(BoardKind::Greenhouse, slug))
            .collect();
        boards.extend(lever.iter().map(|slug| BoardId::new(BoardKind::Lever, slug)));
        boards.push(BoardId::new(BoardKind::Remotive, "finance"));
        boards.push(BoardId::new(BoardKind::Muse, "Accounting and Finance"));

        Self {
            boards,
            rules: RuleSet::default(),
            max_age_days: 10,
            max_results: 100,
            max_tags: 4,
            dedup_key: DedupKey::Url,
            output: OutputConfig::default(),
            http: HttpConfig::default(),
            base_urls: BaseUrls::default(),
            placeholder: None,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            keywords: to_strings(&[
                "financial analyst",
                "fp&a",
                "finance analyst",
                "strategic finance",
                "corporate finance",
                "revenue analyst",
                "finance data analyst",
                "treasury analyst",
                "valuation",
            ]),
            exclude: to_strings(&[
                "defense",
                "raytheon",
                "lockheed",
                "northrop",
                "general dynamics",
                "bae systems",
                "boeing defense",
            ]),
            geography: GeographyRules::default(),
            match_tags: false,
        }
    }
}

impl Default for GeographyRules {
    fn default() -> Self {
        Self {
            terms: to_strings(&[
                "united states",
                "us",
                "usa",
                "remote (us)",
                "remote-us",
                "remote us",
                "remote",
                "anywhere",
            ]),
            patterns: to_strings(&[
                r"\b(AL|AK|AZ|AR|CA|CO|CT|DC|DE|FL|GA|HI|IA|ID|IL|IN|KS|KY|LA|MA|MD|ME|MI|MN|MO|MS|MT|NC|ND|NE|NH|NJ|NM|NV|NY|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VA|VT|WA|WI|WV)\b",
                r"\b(New York|Boston|Austin|San Francisco|Seattle|Chicago|Dallas|Atlanta|Los Angeles|Denver)\b",
            ]),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("jobs.json"),
            shape: OutputShape::Bare,
            key: "jobs".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: format!("jobfeed/{}", env!("CARGO_PKG_VERSION")),
            muse_max_pages: 3,
        }
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            greenhouse: "https://boards-api.greenhouse.io".to_string(),
            lever: "https://api.lever.co".to_string(),
            remotive: "https://remotive.com".to_string(),
            muse: "https://www.themuse.com".to_string(),
        }
    }
}

impl FeedConfig {
    /// Load from an explicit path, `JOBFEED_CONFIG`, or `jobfeed.yaml`,
    /// falling back to built-in defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var("JOBFEED_CONFIG")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                    default.exists().then_some(default)
                }),
        };

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                info!("No configuration file found, using built-in defaults");
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        info!("Loading configuration from {}", path.display());
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            toml::from_str(content).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            serde_yaml::from_str(content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("JOBFEED_OUTPUT") {
            self.output.path = PathBuf::from(path);
        }

        if let Ok(raw) = std::env::var("JOBFEED_MAX_RESULTS") {
            self.max_results = raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("JOBFEED_MAX_RESULTS must be a positive integer"))?;
        }

        Ok(())
    }

    /// Reject configurations that could not produce a sane run.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            anyhow::bail!("max_results must be at least 1");
        }

        if self.output.shape == OutputShape::Wrapped && self.output.key.trim().is_empty() {
            anyhow::bail!("output.key must be set for the wrapped output shape");
        }

        for board in &self.boards {
            if board.slug.trim().is_empty() {
                anyhow::bail!("Board of kind {} has an empty slug", board.kind);
            }
            if !board
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '&' | '.' | '_' | '-'))
            {
                anyhow::bail!("Board slug contains unsupported characters: {}", board.slug);
            }
        }

        crate::filter::CompiledRules::compile(&self.rules)
            .context("Invalid geography pattern in rules")?;

        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_board_kind() {
        let config = FeedConfig::default();
        for kind in [
            BoardKind::Greenhouse,
            BoardKind::Lever,
            BoardKind::Remotive,
            BoardKind::Muse,
        ] {
            assert!(config.boards.iter().any(|b| b.kind == kind), "missing {}", kind);
        }
        assert_eq!(config.max_age_days, 10);
        assert_eq!(config.max_results, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
max_results: 40
dedup_key: title_company
boards:
  - kind: greenhouse
    slug: stripe
    name: Stripe
output:
  shape: wrapped
"#;
        let config = FeedConfig::parse(yaml, Path::new("jobfeed.yaml")).unwrap();
        assert_eq!(config.max_results, 40);
        assert_eq!(config.dedup_key, DedupKey::TitleCompany);
        assert_eq!(config.boards.len(), 1);
        assert_eq!(config.boards[0].display_name(), "Stripe");
        assert_eq!(config.output.shape, OutputShape::Wrapped);
        assert_eq!(config.output.key, "jobs");
        assert_eq!(config.max_age_days, 10);
    }

    #[test]
    fn test_toml_is_accepted_by_extension() {
        let toml = r#"
max_age_days = 7

[[boards]]
kind = "lever"
slug = "brex"
"#;
        let config = FeedConfig::parse(toml, Path::new("jobfeed.toml")).unwrap();
        assert_eq!(config.max_age_days, 7);
        assert_eq!(config.boards[0].kind, BoardKind::Lever);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "max_result: 40\n";
        assert!(FeedConfig::parse(yaml, Path::new("jobfeed.yaml")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_slug_and_zero_cap() {
        let mut config = FeedConfig::default();
        config.boards = vec![BoardId::new(BoardKind::Greenhouse, "stripe/../admin")];
        assert!(config.validate().is_err());

        let mut config = FeedConfig::default();
        config.max_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_broken_pattern() {
        let mut config = FeedConfig::default();
        config.rules.geography.patterns = vec!["(unclosed".to_string()];
        assert!(config.validate().is_err());
    }
}
