//! CVE Toolkit Core Library
//!
//! This library provides the core functionality for the CVE toolkit,
//! which loads vulnerability proof-of-concept records from JSON files,
//! filters them, and resolves their links into downloadable archives.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`record`] - Record model and normalization of raw JSON entries
//! - [`store`] - In-memory session collection with filtering and export
//! - [`resolver`] - Link-to-archive-URL resolution
//! - [`download`] - HTTP download engine with streaming support
//! - [`search`] - Remote repository and advisory search
//! - [`config`] - Token configuration file handling

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod record;
pub mod resolver;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use download::{DownloadError, HttpClient};
pub use record::{
    LoadedRecords, NormalizeError, NormalizedEntry, PocRecord, ReportRecord, load_records,
    normalize_poc_entries, normalize_report_entries,
};
pub use resolver::{DownloadTarget, LinkResolver, ResolveError};
pub use search::{GitHubSearchClient, RepoHit, SearchError, exploit_db_url};
pub use store::{RecordStore, StoreError};
