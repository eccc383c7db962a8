//! Scheduled aggregation of public job-board postings into a static feed.

pub mod cli;
pub mod config;
pub mod filter;
pub mod fs_ops;
pub mod logging;
pub mod pipeline;
pub mod reader;
pub mod sources;
pub mod types;
pub mod writer;

pub use config::FeedConfig;
pub use pipeline::{BoardReport, Pipeline, RunSummary};
pub use sources::{FetchContext, FetchError, JobSource};
pub use types::{BoardId, BoardKind, JobRecord};
pub use writer::FeedWriter;
