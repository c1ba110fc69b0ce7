//! Elasticsearch request bodies for vCon searches.

use serde_json::{Value, json};

use crate::models::SortMode;

/// Fields the index is asked to highlight matches in
pub const HIGHLIGHT_FIELDS: [&str; 22] = [
    "agent",
    "agent.keyword",
    "analysis",
    "analysis.body",
    "analysis.type",
    "analysis.type.keyword",
    "analysis.vendor",
    "attachments.body",
    "attachments.type",
    "created_at",
    "dealer_id",
    "dialog",
    "dialog.meta.direction",
    "dialog.meta.disposition",
    "parties.mailto",
    "parties.meta.extension",
    "parties.meta.role",
    "parties.name",
    "parties.tel",
    "team_id",
    "updated_at",
    "uuid",
];

pub const DEFAULT_SIZE: usize = 10;
pub const MAX_SIZE: usize = 1000;

const CREATED_AT_FIELD: &str = "created_at";
const SUMMARY_TYPE_FIELD: &str = "analysis.type.keyword";
const SUMMARY_TYPE: &str = "summary";

/// Parameters of one search interaction
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Free-text query in Lucene query-string syntax
    pub query: String,
    /// Hits per page
    pub size: usize,
    /// Zero-based page number
    pub page: usize,
    pub sort: SortMode,
    /// Only return records carrying a summary analysis entry
    pub require_summary: bool,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            size: DEFAULT_SIZE,
            page: 0,
            sort: SortMode::default(),
            require_summary: false,
        }
    }

    /// Offset of the first hit of this page
    pub fn from(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Request body for the `_search` endpoint
    ///
    /// The summary requirement is pushed into the query as a filter so that
    /// `size` counts only records that will actually be shown.
    pub fn to_request_body(&self) -> Value {
        let mut bool_query = json!({
            "must": [{ "query_string": { "query": self.query } }]
        });

        if self.require_summary {
            bool_query["filter"] = json!([{ "term": { SUMMARY_TYPE_FIELD: SUMMARY_TYPE } }]);
        }

        let highlight_fields: serde_json::Map<String, Value> =
            HIGHLIGHT_FIELDS.iter().map(|field| (field.to_string(), json!({}))).collect();

        json!({
            "query": { "bool": bool_query },
            "highlight": { "fields": highlight_fields },
            "size": self.size,
            "from": self.from(),
            "sort": sort_clause(self.sort),
            "track_total_hits": true,
        })
    }
}

/// Index-side sort clause for a sort mode
pub fn sort_clause(mode: SortMode) -> Value {
    match mode {
        SortMode::Newest => json!([{ CREATED_AT_FIELD: { "order": "desc" } }]),
        SortMode::Oldest => json!([{ CREATED_AT_FIELD: { "order": "asc" } }]),
        SortMode::Relevant => json!([
            { "_score": { "order": "desc" } },
            { CREATED_AT_FIELD: { "order": "desc" } }
        ]),
    }
}
