use std::borrow::Cow;
use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::models::{SearchHit, SearchPage, Vcon};
use crate::utils::{HighlightStyle, render_highlight, sanitize};

const DIVIDER: &str = "────────────────────────────────────────";
const UUID_PLACEHOLDER: &str = "{uuid}";

// Unreserved URL characters stay as-is
const URL_COMPONENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Link to the conversation detail page for a record id
///
/// A `{uuid}` placeholder in the template is replaced; otherwise the quoted id
/// is appended, which is what search-style detail pages expect.
pub fn detail_url(template: &str, uuid: &str) -> String {
    let encoded = utf8_percent_encode(uuid, URL_COMPONENT).to_string();
    if template.contains(UUID_PLACEHOLDER) {
        template.replace(UUID_PLACEHOLDER, &encoded)
    } else {
        format!("{}%22{}%22", template, encoded)
    }
}

/// Seconds without a trailing `.0` for whole numbers
pub fn format_duration(seconds: f64) -> String {
    format!("{}", seconds)
}

/// Header line: creation time and total duration
pub fn conversation_heading(record: &Vcon) -> String {
    let created = record.created_at.as_deref().map(sanitize).unwrap_or("unknown time".into());
    match record.duration() {
        Ok(seconds) => format!("Conversation at {}, {} seconds", created, format_duration(seconds)),
        Err(_) => format!("Conversation at {}, duration unknown", created),
    }
}

/// Comma-separated party names, or `-` when there are none
pub fn party_list(record: &Vcon) -> String {
    let names = record.party_names();
    if names.is_empty() {
        return "-".to_string();
    }
    names.iter().map(|name| sanitize(name)).collect::<Vec<_>>().join(", ")
}

/// One result block as printed by `search`
pub fn render_hit(hit: &SearchHit, detail_template: &str, style: HighlightStyle) -> String {
    let record = &hit.record;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", DIVIDER);
    let _ = writeln!(out, "{}", conversation_heading(record));

    let summary = record.summary();
    let _ = writeln!(out, "Summary: {}", summary.as_deref().map(sanitize).unwrap_or("(none)".into()));

    let uuid = record.uuid.as_deref().unwrap_or_default();
    let uuid_label = if uuid.is_empty() { Cow::Borrowed("-") } else { sanitize(uuid) };
    let _ = writeln!(out, "UUID: {}", uuid_label);
    let _ = writeln!(out, "Parties: {}", party_list(record));

    for url in record.dialog_urls() {
        let _ = writeln!(out, "Recording: {}", sanitize(url));
    }

    if let Some(score) = hit.score {
        let _ = writeln!(out, "Score: {}", score);
    }

    if !uuid.is_empty() {
        let _ = writeln!(out, "Details: {}", detail_url(detail_template, uuid));
    }

    for (field, fragments) in &hit.highlights {
        let _ = writeln!(out, "{}:", sanitize(field));
        for fragment in fragments {
            let _ = writeln!(out, "  {}", render_highlight(fragment, style));
        }
    }

    out
}

/// Whole results page with a footer describing the position in the result set
pub fn render_page(page: &SearchPage, detail_template: &str, style: HighlightStyle) -> String {
    if page.hits.is_empty() {
        return "No matching conversations.\n".to_string();
    }

    let mut out = String::new();
    for hit in &page.hits {
        out.push_str(&render_hit(hit, detail_template, style));
    }

    let _ = writeln!(out, "{}", DIVIDER);
    let shown = page.hits.len();
    match page.total {
        Some(total) => {
            let _ = writeln!(out, "Page {}: {} shown, {} total matches", page.page_label(), shown, total);
        }
        None => {
            let _ = writeln!(out, "Page {}: {} shown", page.page_label(), shown);
        }
    }
    if let Some(next) = page.next_page() {
        let _ = writeln!(out, "More results: --page {}", next);
    }

    out
}
