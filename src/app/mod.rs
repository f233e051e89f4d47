//! Command-line application helpers: input validation and output rendering.

pub mod presentation;
pub mod url;

pub use presentation::{format_age, print_listing, print_summary, render_summary};
pub use url::validate_and_normalize_url;
