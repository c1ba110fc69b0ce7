//! Loading vCon documents from disk
//!
//! # Error Handling Strategy
//!
//! - **Single files**: any open, size or parse failure is returned to the caller with
//!   context. A single uploaded document is either usable or it is not.
//!
//! - **Directories**: files that fail to parse are logged through `tracing` and skipped,
//!   so one bad export does not hide the rest. If more than 50% of the candidate files
//!   fail, the whole load fails instead of presenting a misleading partial view.
//!
//! - **Shape problems**: the record model performs no schema validation; serde errors
//!   from [`crate::models::Vcon::from_json`] are wrapped with the file path and propagated.

pub mod deserializers;
pub mod vcon;

pub use vcon::{LoadedVcon, load_vcon_dir, load_vcons, parse_vcon_file};
