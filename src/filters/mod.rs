//! Client-side filtering of records and search hits.
//!
//! Filters run after results come back from the index (or off disk for `show`),
//! so they can test derived properties such as "has a transcript" that the index
//! query cannot express.

pub mod apply;
pub mod ast;
pub mod parser;

pub use apply::{HasRecord, apply_filters, matches_filter};
pub use ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
pub use parser::parse_filter;
