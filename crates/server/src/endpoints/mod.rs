//! Endpoint handlers.
//!
//! Each submodule pairs a handler with the Swagger path section it
//! contributes to `GET /openapi`. Sections are concatenated in
//! endpoint registration order by [`openapi`].

pub mod clean_cache;
pub mod openapi;
pub mod openapi_ui;
pub mod ping;
pub mod scrap;
