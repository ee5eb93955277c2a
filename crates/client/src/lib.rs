//! Client code for scrapi.
//!
//! This crate provides the HTTP fetch client, the three extraction
//! strategies (pattern, xpath, css) with the CSS-selector-to-XPath
//! compiler, and the post-processors applied to extracted values.

pub mod extract;
pub mod fetch;
pub mod post;

pub use extract::{Strategy, strategy_for};
pub use fetch::{FetchClient, FetchConfig, FetchError};
pub use post::{PostProcessor, post_processor_for};
