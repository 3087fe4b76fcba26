//! Utility functions shared by the UI and API layers.
//!
//! - **Text processing**: Unicode-aware width and truncation, control
//!   character stripping, status HTML flattening, relative timestamps
//! - **URL validation**: checks applied before opening links in a browser

mod text;
mod url_validator;

pub use text::{display_width, html_to_text, relative_time, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
