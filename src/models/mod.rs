//! Data models for vCon conversation records and search results.
//!
//! - [`Vcon`] - The conversation record with its parties, dialog, attachments and analysis
//! - [`VconField`] - Typed view over the record's top-level keys
//! - [`SearchHit`] / [`SearchPage`] - Ranked index results mapped into records
//! - [`SortMode`] - Result orderings offered by the CLI
//!
//! Records deserialize with serde; list fields treat `null` as empty through the
//! helpers in `parsers::deserializers`.

pub mod field;
pub mod search;
pub mod vcon;

pub use field::VconField;
pub use search::{SearchHit, SearchPage, SortMode};
pub use vcon::{Analysis, Attachment, Dialog, Party, Vcon, body_text};
