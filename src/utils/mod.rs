pub mod paths;
pub mod terminal;

pub use paths::{
    default_download_dir, download_file_name, format_path_with_tilde, validate_file_size,
    write_download,
};
pub use terminal::{HighlightStyle, render_highlight, sanitize};
