//! Query layer for the review catalog.
//!
//! This crate provides:
//! - MovieFilter and SimilarityScorer traits
//! - GenreFilter and TitleFilter implementations
//! - FilterPipeline for composing filters
//! - QueryEngine, which turns a search/genre request into date-ordered ids
//!
//! ## Example Usage
//! ```ignore
//! use query::{QueryEngine, ALL_GENRES};
//!
//! let engine = QueryEngine::new();
//! let ids = engine.ids_for_genre(&index, Some("Guardians"), ALL_GENRES);
//! ```

pub mod engine;
pub mod filter_pipeline;
pub mod filters;
pub mod similarity;
pub mod traits;

// Re-export main types
pub use engine::{ALL_GENRES, DEFAULT_THRESHOLD, QueryEngine};
pub use filter_pipeline::FilterPipeline;
pub use similarity::PartialRatio;
pub use traits::{MovieFilter, SimilarityScorer};
