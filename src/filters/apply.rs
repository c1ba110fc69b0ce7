use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::{SearchHit, Vcon};
use crate::parsers::LoadedVcon;

/// Anything that wraps a record the filters can inspect
pub trait HasRecord {
    fn record(&self) -> &Vcon;
}

impl HasRecord for Vcon {
    fn record(&self) -> &Vcon {
        self
    }
}

impl HasRecord for SearchHit {
    fn record(&self) -> &Vcon {
        &self.record
    }
}

impl HasRecord for LoadedVcon {
    fn record(&self) -> &Vcon {
        &self.record
    }
}

/// Keep the items whose record matches the filter; an empty filter keeps everything
pub fn apply_filters<T: HasRecord>(items: Vec<T>, filter: &FilterExpr) -> Vec<T> {
    if filter.is_empty() {
        return items;
    }

    items.into_iter().filter(|item| matches_filter(item.record(), filter)).collect()
}

/// Evaluate a filter expression left to right against one record
pub fn matches_filter(record: &Vcon, filter: &FilterExpr) -> bool {
    let Some(first) = filter.filters.first() else {
        return true;
    };

    let mut result = matches_field(record, first);

    for (operator, next) in filter.operators.iter().zip(filter.filters.iter().skip(1)) {
        let next_result = matches_field(record, next);
        result = match operator {
            FilterOperator::And => result && next_result,
            FilterOperator::Or => result || next_result,
        };
    }

    result
}

fn matches_field(record: &Vcon, filter: &FieldFilter) -> bool {
    match filter.field {
        FilterField::Party => match_party(record, &filter.value),
        FilterField::Has => match_has(record, &filter.value),
        FilterField::Since => match_since(record, &filter.value),
        FilterField::Vendor => match_vendor(record, &filter.value),
    }
}

/// Case-insensitive substring match over every party identifier, not just the display name
fn match_party(record: &Vcon, value: &str) -> bool {
    let needle = value.to_lowercase();
    record.parties.iter().any(|party| {
        [party.name(), party.email(), party.tel()]
            .into_iter()
            .flatten()
            .any(|id| id.to_lowercase().contains(&needle))
    })
}

fn match_has(record: &Vcon, value: &str) -> bool {
    match value.to_lowercase().as_str() {
        "summary" => record.has_summary(),
        "transcript" => !record.transcript().is_empty(),
        "recording" => !record.dialog_urls().is_empty(),
        "attachment" => !record.attachments.is_empty(),
        _ => false,
    }
}

/// Records created on or after the date; records without a parseable timestamp never match
fn match_since(record: &Vcon, value: &str) -> bool {
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return false;
    };
    let Some(created_at) = record.created_at_time() else {
        return false;
    };
    created_at.date_naive() >= date
}

fn match_vendor(record: &Vcon, value: &str) -> bool {
    let needle = value.to_lowercase();
    record
        .analysis
        .iter()
        .filter_map(|a| a.vendor())
        .any(|vendor| vendor.to_lowercase().contains(&needle))
}
