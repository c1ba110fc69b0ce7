//! Plain-text presentation of records and search results
//!
//! Every function here returns a `String`; printing is left to the CLI so the
//! output can be asserted on directly.

pub mod details;
pub mod hit;
pub mod timestamps;

pub use details::{render_details, render_listing};
pub use hit::{conversation_heading, detail_url, party_list, render_hit, render_page};
pub use timestamps::{format_detail, format_timestamp};
