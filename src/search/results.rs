//! Mapping raw index responses into [`SearchHit`]s.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::filters::HasRecord;
use crate::models::{SearchHit, SortMode, Vcon};

/// The subset of an Elasticsearch `_search` response we use
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: Option<u64>,
    #[serde(default)]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// `hits.total` is a bare number on old servers and an object on newer ones
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Detailed { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) | TotalHits::Detailed { value } => *value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(default)]
    pub highlight: BTreeMap<String, Vec<String>>,
}

impl SearchResponse {
    pub fn total(&self) -> Option<u64> {
        self.hits.total.as_ref().map(TotalHits::value)
    }
}

/// Map each hit's `_source` into a record
///
/// Hits whose source is not a usable vCon are logged and dropped. If more than
/// half of a non-empty page fails to map, the response is treated as an error.
pub fn map_hits(raw_hits: Vec<RawHit>) -> Result<Vec<SearchHit>> {
    let total = raw_hits.len();
    let mut hits = Vec::with_capacity(total);
    let mut failed = 0;

    for raw in raw_hits {
        match Vcon::from_value(raw.source) {
            Ok(record) => {
                hits.push(SearchHit { record, score: raw.score, highlights: raw.highlight })
            }
            Err(e) => {
                failed += 1;
                warn!("Skipping hit {}: {}", raw.id.as_deref().unwrap_or("<no id>"), e);
            }
        }
    }

    if total > 0 && failed * 2 > total {
        bail!("{} of {} search hits could not be read as vCons", failed, total);
    }

    Ok(hits)
}

/// Drop hits without a summary when the caller asked for summarised records only
pub fn retain_summarised(hits: Vec<SearchHit>, require_summary: bool) -> Vec<SearchHit> {
    if !require_summary {
        return hits;
    }
    hits.into_iter().filter(|hit| hit.record.has_summary()).collect()
}

/// Stable sort of hits; records without a parseable `created_at` sort last
pub fn sort_hits(hits: &mut [SearchHit], mode: SortMode) {
    match mode {
        SortMode::Newest => hits.sort_by(|a, b| newest_first(a.created_at(), b.created_at())),
        SortMode::Oldest => hits.sort_by(|a, b| oldest_first(a.created_at(), b.created_at())),
        SortMode::Relevant => hits.sort_by(|a, b| {
            highest_first(a.score, b.score)
                .then_with(|| newest_first(a.created_at(), b.created_at()))
        }),
    }
}

/// Stable sort of records by creation time; there is no score outside a search,
/// so [`SortMode::Relevant`] keeps the input order
pub fn sort_records<T: HasRecord>(items: &mut [T], mode: SortMode) {
    match mode {
        SortMode::Newest => items.sort_by(|a, b| {
            newest_first(a.record().created_at_time(), b.record().created_at_time())
        }),
        SortMode::Oldest => items.sort_by(|a, b| {
            oldest_first(a.record().created_at_time(), b.record().created_at_time())
        }),
        SortMode::Relevant => {}
    }
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    compare_present_first(a, b, |a, b| b.cmp(&a))
}

fn oldest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    compare_present_first(a, b, |a, b| a.cmp(&b))
}

fn highest_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    compare_present_first(a, b, |a, b| b.total_cmp(&a))
}

fn compare_present_first<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hit(uuid: &str, created_at: Option<&str>, score: Option<f64>) -> SearchHit {
        let record = Vcon::from_value(json!({"uuid": uuid, "created_at": created_at})).unwrap();
        SearchHit { record, score, highlights: BTreeMap::new() }
    }

    fn order(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.record.uuid.as_deref().unwrap()).collect()
    }

    #[test]
    fn test_response_deserializes_object_total() {
        let response: SearchResponse = serde_json::from_value(json!({
            "took": 4,
            "hits": {
                "total": {"value": 42, "relation": "eq"},
                "hits": [{
                    "_id": "doc-1",
                    "_score": 1.5,
                    "_source": {"uuid": "u1", "dealer_id": "D1"},
                    "highlight": {"parties.name": ["<em>Alice</em>"]}
                }]
            }
        }))
        .unwrap();

        assert_eq!(response.total(), Some(42));
        assert_eq!(response.hits.hits[0].score, Some(1.5));
        assert_eq!(response.hits.hits[0].highlight["parties.name"], vec!["<em>Alice</em>"]);
    }

    #[test]
    fn test_response_deserializes_numeric_total_and_missing_parts() {
        let response: SearchResponse =
            serde_json::from_value(json!({"hits": {"total": 7, "hits": [{"_source": {}}]}})).unwrap();
        assert_eq!(response.total(), Some(7));
        assert!(response.hits.hits[0].highlight.is_empty());
        assert_eq!(response.hits.hits[0].score, None);
    }

    #[test]
    fn test_map_hits_builds_records() {
        let raw = vec![RawHit {
            id: Some("doc-1".into()),
            score: Some(2.0),
            source: json!({"uuid": "u1", "analysis": [{"type": "summary", "body": "S"}]}),
            highlight: BTreeMap::from([("uuid".to_string(), vec!["<em>u1</em>".to_string()])]),
        }];

        let hits = map_hits(raw).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.summary().as_deref(), Some("S"));
        assert_eq!(hits[0].score, Some(2.0));
        assert_eq!(hits[0].highlights["uuid"], vec!["<em>u1</em>"]);
    }

    #[test]
    fn test_map_hits_skips_minority_bad_sources() {
        let raw = vec![
            RawHit { source: json!({"uuid": "a"}), ..Default::default() },
            RawHit { source: json!({"uuid": "b"}), ..Default::default() },
            RawHit { source: json!({"dialog": "broken"}), ..Default::default() },
        ];
        assert_eq!(map_hits(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_map_hits_keeps_numeric_party_identifiers() {
        let raw = vec![RawHit {
            source: json!({"uuid": "n", "parties": [{"tel": 15551234, "name": null}]}),
            ..Default::default()
        }];
        let hits = map_hits(raw).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.party_names(), vec!["15551234"]);
    }

    #[test]
    fn test_map_hits_fails_on_majority_bad_sources() {
        let raw = vec![
            RawHit { source: json!({"uuid": "a"}), ..Default::default() },
            RawHit { source: json!({"dialog": "broken"}), ..Default::default() },
            RawHit { source: json!("not an object"), ..Default::default() },
        ];
        let err = map_hits(raw).unwrap_err();
        assert!(err.to_string().contains("2 of 3 search hits"));
    }

    #[test]
    fn test_retain_summarised() {
        let with_summary = SearchHit::new(
            Vcon::from_value(json!({"uuid": "s", "analysis": [{"type": "summary", "body": "x"}]}))
                .unwrap(),
        );
        let without = hit("n", None, None);

        let kept = retain_summarised(vec![with_summary.clone(), without.clone()], true);
        assert_eq!(order(&kept), vec!["s"]);

        let kept = retain_summarised(vec![with_summary, without], false);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let mut hits = vec![
            hit("mid", Some("2024-02-01T00:00:00Z"), None),
            hit("none", None, None),
            hit("new", Some("2024-03-01T00:00:00Z"), None),
            hit("old", Some("2024-01-01T00:00:00Z"), None),
        ];

        sort_hits(&mut hits, SortMode::Newest);
        assert_eq!(order(&hits), vec!["new", "mid", "old", "none"]);

        sort_hits(&mut hits, SortMode::Oldest);
        assert_eq!(order(&hits), vec!["old", "mid", "new", "none"]);
    }

    #[test]
    fn test_sort_records_by_creation() {
        let mut records = vec![
            Vcon::from_value(json!({"uuid": "a", "created_at": "2024-01-01T00:00:00Z"})).unwrap(),
            Vcon::from_value(json!({"uuid": "b"})).unwrap(),
            Vcon::from_value(json!({"uuid": "c", "created_at": "2024-05-01T00:00:00Z"})).unwrap(),
        ];

        sort_records(&mut records, SortMode::Relevant);
        let order: Vec<_> = records.iter().filter_map(|r| r.uuid.as_deref()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);

        sort_records(&mut records, SortMode::Newest);
        let order: Vec<_> = records.iter().filter_map(|r| r.uuid.as_deref()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_relevant_ties_broken_by_recency() {
        let mut hits = vec![
            hit("low", Some("2024-03-01T00:00:00Z"), Some(0.5)),
            hit("tie-old", Some("2024-01-01T00:00:00Z"), Some(2.0)),
            hit("tie-new", Some("2024-02-01T00:00:00Z"), Some(2.0)),
            hit("unscored", Some("2024-04-01T00:00:00Z"), None),
        ];

        sort_hits(&mut hits, SortMode::Relevant);
        assert_eq!(order(&hits), vec!["tie-new", "tie-old", "low", "unscored"]);
    }
}
