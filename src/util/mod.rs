//! Small helpers shared by the UI layer.
//!
//! - **Text**: display-width truncation and sanitizing server-provided strings
//! - **URLs**: checks before handing a link to the system browser
//!
//! ```
//! use subdeck::util::{sanitize_line, truncate_to_width};
//!
//! assert_eq!(truncate_to_width("Subscriptions", 8), "Subscri…");
//! assert_eq!(sanitize_line("Daily\nNews\x1b"), "Daily News");
//! ```

mod text;
mod url_validator;

pub use text::{sanitize_line, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
