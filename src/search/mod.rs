//! Full-text search over the vCon index.
//!
//! One search interaction runs top to bottom:
//!
//! 1. [`SearchOptions::to_request_body`] builds the query, highlight and sort clauses
//! 2. a [`SearchBackend`] executes it (blocking, no retries)
//! 3. [`results::map_hits`] turns each hit's `_source` into a [`crate::models::Vcon`]
//! 4. the summary requirement and client filters narrow the page, then it is sorted
//!
//! Index failures propagate to the caller unchanged; the user retries by re-running.

pub mod client;
pub mod query;
pub mod results;

use anyhow::Result;
use tracing::info;

pub use client::{ElasticClient, SearchBackend};
pub use query::{HIGHLIGHT_FIELDS, SearchOptions};
pub use results::{SearchResponse, map_hits, retain_summarised, sort_hits, sort_records};

use crate::filters::{FilterExpr, apply_filters};
use crate::models::SearchPage;

/// Run one search and return the filtered, sorted page
pub fn run_search<B>(backend: &B, options: &SearchOptions, filter: &FilterExpr) -> Result<SearchPage>
where
    B: SearchBackend + ?Sized,
{
    let response = backend.search(&options.to_request_body())?;
    let total = response.total();

    let hits = map_hits(response.hits.hits)?;
    let retrieved = hits.len();

    let hits = retain_summarised(hits, options.require_summary);
    let mut hits = apply_filters(hits, filter);
    sort_hits(&mut hits, options.sort);

    if hits.len() < retrieved {
        info!("{} of {} hits removed by filters", retrieved - hits.len(), retrieved);
    }

    Ok(SearchPage { hits, total, page: options.page, size: options.size })
}
