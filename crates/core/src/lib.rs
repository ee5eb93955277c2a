//! Core types and shared functionality for scrapi.
//!
//! This crate provides:
//! - The scrap definition table (what to fetch, how to extract)
//! - File-backed content cache keyed by fetch URL
//! - Application configuration

pub mod cache;
pub mod config;
pub mod definitions;

pub use cache::FileCache;
pub use config::AppConfig;
pub use definitions::{Definitions, ScrapDefinition};
