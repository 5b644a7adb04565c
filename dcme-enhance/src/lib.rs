//! dcme-enhance library interface
//!
//! Exposes the enhancer components for integration testing: metadata
//! loading, alt-text generation, the subject-classification engine and the
//! per-record pipeline.

pub mod alt_text;
pub mod classifier;
pub mod loader;
pub mod pipeline;
pub mod services;

pub use crate::pipeline::EnhancePipeline;
