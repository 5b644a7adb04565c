//! Shared types and utilities for the Dublin Core metadata enhancer
//!
//! Holds the pieces both the enhancer binary and its tests depend on:
//! record model, configuration, error types, JSON-LD output formatting and
//! filename generation.

pub mod config;
pub mod error;
pub mod filenames;
pub mod jsonld;
pub mod record;
pub mod subject;

pub use config::EnhancerConfig;
pub use error::{Error, Result};
pub use record::Record;
pub use subject::{EnhancedRecord, PrefLabel, Subject};
