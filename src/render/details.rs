use std::fmt::Write;

use super::hit::party_list;
use super::timestamps::{format_detail, format_timestamp};
use crate::models::Vcon;
use crate::parsers::LoadedVcon;
use crate::utils::{format_path_with_tilde, sanitize};

const HEADING: &str = "vCon Summary";

/// Full record view printed by `show` for a single document
///
/// With `raw` set, the pretty-printed document is appended after the
/// readable sections.
pub fn render_details(record: &Vcon, raw: bool) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", HEADING);
    let _ = writeln!(out, "{}", "=".repeat(HEADING.len()));
    let _ = writeln!(out, "UUID: {}", record.uuid.as_deref().map(sanitize).unwrap_or("-".into()));
    let _ = writeln!(
        out,
        "Created: {}",
        sanitize(&format_detail(record.created_at.as_deref(), record.created_at_time()))
    );
    let _ = writeln!(
        out,
        "Updated: {}",
        sanitize(&format_detail(record.updated_at.as_deref(), record.updated_at_time()))
    );
    match record.duration() {
        Ok(seconds) => {
            let _ = writeln!(out, "Duration: {} seconds", seconds);
        }
        Err(_) => {
            let _ = writeln!(out, "Duration: unknown");
        }
    }
    let _ = writeln!(out, "Parties: {}", party_list(record));

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary");
    match record.summary() {
        Some(summary) => {
            let _ = writeln!(out, "{}", sanitize(&summary));
        }
        None => {
            let _ = writeln!(out, "(none)");
        }
    }

    let urls = record.dialog_urls();
    let _ = writeln!(out);
    let _ = writeln!(out, "Recorded Dialog");
    if urls.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for url in urls {
        let _ = writeln!(out, "  {}", sanitize(url));
    }

    let transcript = record.transcript();
    let _ = writeln!(out);
    let _ = writeln!(out, "Transcript");
    if transcript.is_empty() {
        let _ = writeln!(out, "(none)");
    } else {
        let _ = writeln!(out, "{}", sanitize(&transcript));
    }

    if raw {
        let _ = writeln!(out);
        let _ = writeln!(out, "Raw vCon");
        let _ = writeln!(out, "{}", record.to_json_pretty());
    }

    out
}

/// One line per loaded file: age, uuid, parties and where it came from
pub fn render_listing(records: &[LoadedVcon]) -> String {
    if records.is_empty() {
        return "No vCon files found.\n".to_string();
    }

    let mut out = String::new();
    for loaded in records {
        let record = &loaded.record;
        let age = record.created_at_time().map(|ts| format_timestamp(&ts)).unwrap_or("-".into());
        let uuid = record.uuid.as_deref().map(sanitize).unwrap_or("-".into());
        let _ = writeln!(
            out,
            "{:<12}  {:<36}  {}  ({})",
            age,
            uuid,
            party_list(record),
            format_path_with_tilde(&loaded.path)
        );
    }
    let _ = writeln!(out, "{} vCon files", records.len());

    out
}
