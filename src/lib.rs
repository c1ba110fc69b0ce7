//! vCon Search - Search and inspect vCon conversation records
//!
//! This library provides the pieces behind the `vcon-search` binary:
//!
//! - A lossless record model for vCon documents ([`Vcon`]) with typed field access
//! - Loading vCon JSON files and directories from disk
//! - Building full-text queries against an Elasticsearch index of vCons and
//!   mapping the hits back into records
//! - A small filter language applied client-side to search hits and loaded files
//! - Plain-text rendering of results and record details
//!
//! # Example
//!
//! ```
//! use vcon_search::Vcon;
//!
//! let vcon = Vcon::from_json(r#"{
//!     "uuid": "0190a6b2-0000-7000-8000-000000000001",
//!     "parties": [{"name": "Alice"}],
//!     "dialog": [{"url": "https://example.com/a.wav", "duration": 12}],
//!     "analysis": [{"type": "summary", "body": "Booked an oil change"}]
//! }"#)?;
//!
//! assert_eq!(vcon.party_names(), vec!["Alice"]);
//! assert_eq!(vcon.duration()?, 12.0);
//! assert_eq!(vcon.summary().as_deref(), Some("Booked an oil change"));
//! # Ok::<(), vcon_search::VconError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod parsers;
pub mod render;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::VconError;
pub use filters::{FilterExpr, parse_filter};
pub use models::{SearchHit, SearchPage, SortMode, Vcon, VconField};
pub use parsers::{LoadedVcon, load_vcons, parse_vcon_file};
pub use search::{ElasticClient, SearchBackend, SearchOptions, run_search};
