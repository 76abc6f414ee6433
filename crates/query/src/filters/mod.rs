//! Filter implementations for the query pipeline.
//!
//! This module contains the concrete filters the QueryEngine composes
//! into a FilterPipeline.

pub mod genre;
pub mod title;

// Re-export for convenience
pub use genre::GenreFilter;
pub use title::TitleFilter;
