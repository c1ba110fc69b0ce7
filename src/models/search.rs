use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;

use super::vcon::Vcon;

/// Result ordering offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest created first
    Oldest,
    /// Highest relevance score first, newest first among equal scores
    Relevant,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Relevant => "relevant",
        };
        f.write_str(label)
    }
}

/// One ranked search result mapped into the record model
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: Vcon,
    pub score: Option<f64>,
    /// Field name to highlighted fragments, as returned by the index
    pub highlights: BTreeMap<String, Vec<String>>,
}

impl SearchHit {
    pub fn new(record: Vcon) -> Self {
        Self { record, score: None, highlights: BTreeMap::new() }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.record.created_at_time()
    }
}

/// One page of results after filtering and sorting
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    /// Total matches reported by the index, when known
    pub total: Option<u64>,
    pub page: usize,
    pub size: usize,
}

impl SearchPage {
    /// Whether the index reports more matches past this page
    pub fn has_next(&self) -> bool {
        match self.total {
            Some(total) => {
                let through = (self.page as u64).saturating_add(1).saturating_mul(self.size as u64);
                through < total
            }
            None => false,
        }
    }

    /// Page number to request for the following page, if there is one
    pub fn next_page(&self) -> Option<usize> {
        self.page.checked_add(1).filter(|_| self.has_next())
    }

    /// One-based page label for display
    pub fn page_label(&self) -> u128 {
        self.page as u128 + 1
    }
}
