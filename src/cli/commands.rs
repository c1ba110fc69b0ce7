use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::filters::{FilterExpr, apply_filters, parse_filter};
use crate::models::SortMode;
use crate::parsers::load_vcons;
use crate::render::{render_details, render_listing, render_page};
use crate::search::query::{DEFAULT_SIZE, MAX_SIZE};
use crate::search::{ElasticClient, SearchOptions, run_search, sort_records};
use crate::utils::{HighlightStyle, default_download_dir, format_path_with_tilde, write_download};

#[derive(Parser)]
#[command(name = "vcon-search")]
#[command(version = "0.1.0")]
#[command(about = "Search and inspect vCon conversation records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full-text search over the vCon index
    Search {
        /// Query in Lucene query-string syntax
        query: String,

        /// Hits per page
        #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
        size: usize,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Result ordering
        #[arg(long, value_enum, default_value_t = SortMode::Newest)]
        sort: SortMode,

        /// Only show conversations that have a summary
        #[arg(long)]
        require_summary: bool,

        /// Client-side filter, e.g. "party:alice has:transcript since:2024-01-01"
        #[arg(long)]
        filter: Option<String>,

        /// Save each shown record as JSON (defaults to the Downloads directory)
        #[arg(long, value_name = "DIR")]
        download: Option<Option<PathBuf>>,
    },

    /// Show a vCon file, or list every vCon in a directory
    Show {
        /// A vCon JSON file or a directory of them
        path: PathBuf,

        /// Append the raw JSON document
        #[arg(long)]
        raw: bool,

        /// Ordering for directory listings
        #[arg(long, value_enum, default_value_t = SortMode::Newest)]
        sort: SortMode,

        /// Filter for directory listings, same syntax as for search
        #[arg(long)]
        filter: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { query, size, page, sort, require_summary, filter, download }) => {
            let options = SearchOptions { query, size, page, sort, require_summary };
            search(&options, filter.as_deref(), download)?;
        }
        Some(Commands::Show { path, raw, sort, filter }) => {
            show(&path, raw, sort, filter.as_deref())?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn parse_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|_| format!("`{}` is not a number", value))?;
    if (1..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("size must be between 1 and {}", MAX_SIZE))
    }
}

fn parse_optional_filter(filter: Option<&str>) -> Result<FilterExpr> {
    match filter {
        Some(text) => parse_filter(text).context("Invalid --filter expression"),
        None => Ok(FilterExpr::new()),
    }
}

fn search(options: &SearchOptions, filter: Option<&str>, download: Option<Option<PathBuf>>) -> Result<()> {
    // Validate user input before touching the network
    let filter = parse_optional_filter(filter)?;
    let config = Config::from_env()?;
    let client = ElasticClient::new(&config)?;

    info!(query = %options.query, page = options.page, sort = %options.sort, "running search");
    let page = run_search(&client, options, &filter)?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render_page(&page, &config.detail_url, HighlightStyle::detect()))?;

    if let Some(dir) = download {
        let dir = dir.unwrap_or_else(default_download_dir);
        for (index, hit) in page.hits.iter().enumerate() {
            let path = write_download(&dir, &hit.record, index)?;
            writeln!(stdout, "Saved {}", format_path_with_tilde(&path))?;
        }
    }

    Ok(())
}

fn show(path: &Path, raw: bool, sort: SortMode, filter: Option<&str>) -> Result<()> {
    let filter = parse_optional_filter(filter)?;
    let mut stdout = io::stdout().lock();

    if path.is_dir() {
        let mut records = apply_filters(load_vcons(path)?, &filter);
        sort_records(&mut records, sort);
        write!(stdout, "{}", render_listing(&records))?;
        return Ok(());
    }

    for loaded in load_vcons(path)? {
        write!(stdout, "{}", render_details(&loaded.record, raw))?;
    }

    Ok(())
}
