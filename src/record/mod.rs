//! Record model and normalization of raw JSON entries.
//!
//! Two divergent input schemas are recognized:
//!
//! - A flat list of CVE objects with keys `CVE ID`, `Author`, `Date`,
//!   `Severity`, `Link` — normalized into [`PocRecord`].
//! - A list of report objects, each carrying `new` and `updated` sub-lists
//!   of entries with keys `cveId`, `dateUpdated`, `cveOrgLink`,
//!   `githubLink` — normalized into [`ReportRecord`].
//!
//! The two shapes are deliberately kept as distinct record types rather
//! than one struct with optional unused fields; they share only the
//! [`NormalizedEntry`] capability (sequence id, identifier, link,
//! searchable text) that the store and filter operate on.

mod error;
mod model;
mod normalize;

pub use error::NormalizeError;
pub use model::{NormalizedEntry, PocRecord, ReportRecord};
pub use normalize::{
    LoadedRecords, load_records, normalize_poc_entries, normalize_poc_entries_for_host,
    normalize_report_entries,
};
