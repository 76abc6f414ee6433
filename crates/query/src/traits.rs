//! Core traits for the query layer.
//!
//! `MovieFilter` lets the engine compose genre and title conditions, and
//! `SimilarityScorer` keeps the fuzzy-matching algorithm swappable without
//! touching the filters that use it.

use catalog::Movie;

/// Core trait for filtering movies.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows a pipeline to be shared with request handlers
/// - Filters only look at one movie at a time; ordering is the index's job
pub trait MovieFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// True if `movie` should stay in the result set
    fn matches(&self, movie: &Movie) -> bool;
}

/// Approximate string similarity on a 0 to 100 scale.
///
/// Implementations must return 100 for a perfect match and 0 when either
/// input is empty.
pub trait SimilarityScorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    /// Score how well `query` matches `candidate`
    fn score(&self, query: &str, candidate: &str) -> u8;
}
