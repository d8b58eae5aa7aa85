//! CLI entry point for the CVE toolkit.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cve_toolkit_core::{
    Config, GitHubSearchClient, HttpClient, LinkResolver, LoadedRecords, NormalizedEntry,
    PocRecord, RecordStore, ReportRecord, exploit_db_url, load_records,
};

mod cli;

use cli::{Cli, Command, TokenAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?cli, "CLI arguments parsed");

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(cve_toolkit_core::config::default_config_path);

    match cli.command {
        Command::List { file, query } => run_list(&file, &query),
        Command::Show { file, id } => run_show(&file, id),
        Command::Export {
            file,
            output,
            id,
            query,
        } => run_export(&file, &output, id, &query),
        Command::Download {
            file,
            id,
            url,
            output_dir,
            branch,
        } => run_download(file.as_deref(), id, url, &output_dir, branch).await,
        Command::Search { year, query } => run_search(&config_path, year, &query).await,
        Command::Advisory { year, query } => {
            println!("{}", exploit_db_url(year, &query));
            Ok(())
        }
        Command::Token { action } => run_token(&config_path, &action),
    }
}

/// Reads and normalizes a record file in either recognized schema.
fn load_file(file: &Path) -> Result<LoadedRecords> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let loaded =
        load_records(&text).with_context(|| format!("failed to load {}", file.display()))?;
    info!(records = loaded.len(), file = %file.display(), "records loaded");
    Ok(loaded)
}

fn run_list(file: &Path, query: &str) -> Result<()> {
    match load_file(file)? {
        LoadedRecords::Pocs(records) => {
            let mut store = RecordStore::new();
            store.load(records);
            let view = store.filter(query);
            for record in &view {
                print_poc_row(record);
            }
            println!("showing {} of {} records", view.len(), store.len());
        }
        LoadedRecords::Reports(records) => {
            let mut store = RecordStore::new();
            store.load(records);
            let view = store.filter(query);
            for record in &view {
                print_report_row(record);
            }
            println!("showing {} of {} records", view.len(), store.len());
        }
    }
    Ok(())
}

fn run_show(file: &Path, id: u64) -> Result<()> {
    match load_file(file)? {
        LoadedRecords::Pocs(records) => {
            let mut store = RecordStore::new();
            store.load(records);
            print_poc_row(store.get(id)?);
            println!("{}", store.export_one(id)?);
        }
        LoadedRecords::Reports(records) => {
            let mut store = RecordStore::new();
            store.load(records);
            print_report_row(store.get(id)?);
            println!("{}", store.export_one(id)?);
        }
    }
    Ok(())
}

fn run_export(file: &Path, output: &Path, id: Option<u64>, query: &str) -> Result<()> {
    let text = match load_file(file)? {
        LoadedRecords::Pocs(records) => render_export(records, id, query)?,
        LoadedRecords::Reports(records) => render_export(records, id, query)?,
    };
    std::fs::write(output, text)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("exported to {}", output.display());
    Ok(())
}

/// Serializes the full collection, a filter view, or a single raw entry.
fn render_export<R: NormalizedEntry>(
    records: Vec<R>,
    id: Option<u64>,
    query: &str,
) -> Result<String> {
    let mut store = RecordStore::new();
    store.load(records);
    let text = match id {
        Some(id) => store.export_one(id)?,
        None if query.is_empty() => store.export_all()?,
        None => RecordStore::export_entries(&store.filter(query))?,
    };
    Ok(text)
}

async fn run_download(
    file: Option<&Path>,
    id: Option<u64>,
    url: Option<String>,
    output_dir: &Path,
    branch: Option<String>,
) -> Result<()> {
    // Either a direct URL (e.g. a search hit) or a record looked up by id.
    let link = match (url, file, id) {
        (Some(url), _, _) => url,
        (None, Some(file), Some(id)) => match load_file(file)? {
            LoadedRecords::Pocs(records) => record_link(records, id)?,
            LoadedRecords::Reports(records) => record_link(records, id)?,
        },
        _ => anyhow::bail!("either --url or a record file and id are required"),
    };

    let mut resolver = LinkResolver::new();
    if let Some(branch) = branch {
        resolver = resolver.with_branch(branch);
    }
    let target = resolver.resolve(&link)?;

    let spinner = download_spinner(&target.archive_url);
    let client = HttpClient::new();
    let result = client.download(&target, output_dir).await;
    spinner.finish_and_clear();

    let saved = result?;
    println!("downloaded to {}", saved.display());
    Ok(())
}

/// Looks up the primary link of one record by sequence id.
fn record_link<R: NormalizedEntry>(records: Vec<R>, id: u64) -> Result<String> {
    let mut store = RecordStore::new();
    store.load(records);
    Ok(store.get(id)?.link().to_string())
}

async fn run_search(config_path: &Path, year: u16, query: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let client = GitHubSearchClient::new(config.github_token);
    let hits = client.search(year, query).await?;

    for hit in &hits {
        println!(
            "{:<30} {:>6}  {:<15} {}",
            hit.name, hit.star_count, hit.owner_login, hit.html_url
        );
        println!("    {}", hit.description);
    }
    println!("found {} repositories", hits.len());
    Ok(())
}

fn run_token(config_path: &Path, action: &TokenAction) -> Result<()> {
    let mut config = Config::load(config_path)?;
    match action {
        TokenAction::Set { token } => {
            config.github_token = Some(token.clone());
            config.save(config_path)?;
            println!("token configured");
        }
        TokenAction::Clear => {
            config.github_token = None;
            config.save(config_path)?;
            println!("token cleared");
        }
    }
    Ok(())
}

fn print_poc_row(record: &PocRecord) {
    println!(
        "{:>4}  {:<16} {:<15} {:<12} {:<8} {}",
        record.sequence_id,
        record.identifier,
        record.author,
        record.date,
        record.severity,
        record.link
    );
}

fn print_report_row(record: &ReportRecord) {
    println!(
        "{:>4}  {:<16} {:<22} {}  {}",
        record.sequence_id,
        record.identifier,
        record.date_updated,
        record.advisory_link,
        record.link
    );
}

fn download_spinner(url: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("downloading {url}"));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}
