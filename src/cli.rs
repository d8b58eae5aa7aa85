//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Load, filter, and archive CVE proof-of-concept records.
///
/// The toolkit ingests CVE lists in two JSON schemas, filters them across
/// all displayable fields, and resolves record links into downloadable
/// archives.
#[derive(Parser, Debug)]
#[command(name = "cve-toolkit")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Toolkit subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a JSON file and list its records, optionally filtered
    List {
        /// JSON file in either recognized schema
        file: PathBuf,

        /// Case-insensitive free-text filter across all fields
        #[arg(short = 'f', long, default_value = "")]
        query: String,
    },

    /// Show one record by its sequence id
    Show {
        /// JSON file in either recognized schema
        file: PathBuf,

        /// 1-based sequence id assigned at load time
        id: u64,
    },

    /// Export raw records back to pretty-printed JSON
    Export {
        /// JSON file in either recognized schema
        file: PathBuf,

        /// Destination file for the export
        #[arg(short, long)]
        output: PathBuf,

        /// Export a single record (bare object, not wrapped in an array)
        #[arg(long, conflicts_with = "query")]
        id: Option<u64>,

        /// Export only records matching this filter
        #[arg(short = 'f', long, default_value = "")]
        query: String,
    },

    /// Resolve a record's link (or a URL) and download the archive
    Download {
        /// JSON file in either recognized schema
        #[arg(required_unless_present = "url")]
        file: Option<PathBuf>,

        /// 1-based sequence id of the record to download
        #[arg(required_unless_present = "url")]
        id: Option<u64>,

        /// Download a repository or file URL directly (e.g. a search hit)
        #[arg(long, conflicts_with_all = ["file", "id"])]
        url: Option<String>,

        /// Directory downloads are saved to (created if absent)
        #[arg(short, long, default_value = "downloads")]
        output_dir: PathBuf,

        /// Branch used in repository archive URLs
        #[arg(long)]
        branch: Option<String>,
    },

    /// Search hosted repositories for CVE proof-of-concepts
    Search {
        /// CVE year, combined into a literal CVE-<year> query token
        year: u16,

        /// Free-text portion of the search query
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the advisory search URL for CVE-<year>-<query>
    Advisory {
        /// CVE year
        year: u16,

        /// Query suffix (typically a CVE number)
        query: String,
    },

    /// Manage the access token used for repository search
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

/// Token management actions.
#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Store an access token in the config file
    Set {
        /// The personal access token
        token: String,
    },

    /// Remove the configured token
    Clear,
}
