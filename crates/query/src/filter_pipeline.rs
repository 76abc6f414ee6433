//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::MovieFilter;
use catalog::{Movie, MovieIndex};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TitleFilter::new("Guardians", scorer, 70))
///     .add_filter(GenreFilter::new("Action"));
///
/// let movies = pipeline.apply(&index);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn MovieFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl MovieFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True if every filter keeps `movie`
    pub fn matches(&self, movie: &Movie) -> bool {
        self.filters.iter().all(|filter| filter.matches(movie))
    }

    /// Apply all filters in sequence to the movies of `index`.
    ///
    /// ## Algorithm
    /// 1. Start with every movie, in release-date order
    /// 2. For each filter in order, keep the movies it matches and log the
    ///    surviving count
    /// 3. Return the survivors, still in release-date order
    pub fn apply<'a>(&self, index: &'a MovieIndex) -> Vec<&'a Movie> {
        let mut current: Vec<&Movie> = index.iter().collect();
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current.retain(|movie| filter.matches(movie));
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::GenreFilter;
    use catalog::{Genre, NaiveDate, make_genre_association};

    fn create_test_index() -> MovieIndex {
        let mut index = MovieIndex::new();
        let mut drama = Genre::new("Drama");
        let days = [(1, 2016, "Split"), (2, 2012, "Prometheus"), (3, 2016, "Sing")];

        for (id, year, title) in days {
            let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            let mut movie = Movie::new(date, title).with_id(id);
            if id != 3 {
                make_genre_association(&mut movie, &mut drama).unwrap();
            }
            index.insert(movie).unwrap();
        }
        index
    }

    #[test]
    fn test_empty_pipeline() {
        let index = create_test_index();
        let pipeline = FilterPipeline::new();

        let movies = pipeline.apply(&index);

        assert!(pipeline.is_empty());
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].title(), "Prometheus");
    }

    #[test]
    fn test_single_filter() {
        let index = create_test_index();
        let pipeline = FilterPipeline::new().add_filter(GenreFilter::new("Drama"));

        let titles: Vec<&str> = pipeline.apply(&index).into_iter().map(Movie::title).collect();

        assert_eq!(pipeline.len(), 1);
        assert_eq!(titles, vec!["Prometheus", "Split"]);
    }

    #[test]
    fn test_all_filters_must_match() {
        let index = create_test_index();
        let pipeline = FilterPipeline::new()
            .add_filter(GenreFilter::new("Drama"))
            .add_filter(GenreFilter::new("Comedy"));

        assert!(pipeline.apply(&index).is_empty());
        assert!(!pipeline.matches(index.get(1).unwrap()));
    }
}
