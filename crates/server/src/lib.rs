//! HTTP gateway wiring for scrapi.
//!
//! The binary in `main.rs` is a thin shell around this library:
//!
//! - `router`: the ordered endpoint table with regex path matching
//! - `pipeline`: the scrap request pipeline and its error taxonomy
//! - `endpoints`: handlers for the fixed endpoints and their API docs
//! - `app`: the axum service gluing the above together
//! - `state`: shared per-process application state

pub mod app;
pub mod endpoints;
pub mod pipeline;
pub mod router;
pub mod state;
