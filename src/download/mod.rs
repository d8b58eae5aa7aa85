//! HTTP download pipeline for streaming resolved archives to disk.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient, never whole-body buffering)
//! - Timestamp-qualified destination names (no overwrite within a session)
//! - Atomic completion (temp name, rename on success)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context

mod client;
mod constants;
mod error;
mod filename;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{ReservedPath, capture_timestamp, destination_filename, reserve_unique_path};
