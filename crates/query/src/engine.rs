//! Query engine: filtered, date-ordered movie id lists for paginated views.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenreFilter, TitleFilter};
use crate::similarity::PartialRatio;
use crate::traits::SimilarityScorer;
use catalog::{Movie, MovieId, MovieIndex};
use std::fmt;
use std::sync::Arc;

/// Genre name that disables genre filtering
pub const ALL_GENRES: &str = "all";

/// Title scores must be strictly greater than this to match
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Builds filter pipelines for search/genre requests and runs them against
/// a `MovieIndex`.
#[derive(Clone)]
pub struct QueryEngine {
    scorer: Arc<dyn SimilarityScorer>,
    threshold: u8,
}

impl QueryEngine {
    /// Engine with the `PartialRatio` scorer and the default threshold
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(PartialRatio), DEFAULT_THRESHOLD)
    }

    pub fn with_scorer(scorer: Arc<dyn SimilarityScorer>, threshold: u8) -> Self {
        Self { scorer, threshold }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Pipeline for one request: a title filter when there is search text,
    /// then a genre filter unless `genre_name` is [`ALL_GENRES`].
    pub fn pipeline_for(&self, search_text: Option<&str>, genre_name: &str) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();
        if let Some(text) = search_text {
            pipeline = pipeline.add_filter(TitleFilter::new(
                text,
                Arc::clone(&self.scorer),
                self.threshold,
            ));
        }
        if genre_name != ALL_GENRES {
            pipeline = pipeline.add_filter(GenreFilter::new(genre_name));
        }
        pipeline
    }

    /// Ids of the movies matching the request, in release-date order.
    ///
    /// | search   | genre    | result                                      |
    /// |----------|----------|---------------------------------------------|
    /// | `Some`   | `"all"`  | titles that fuzzy-match                     |
    /// | `Some`   | name     | titles that fuzzy-match and carry the genre |
    /// | `None`   | name     | movies carrying the genre                   |
    /// | `None`   | `"all"`  | every movie                                 |
    ///
    /// No match yields an empty `Vec`.
    pub fn ids_for_genre(
        &self,
        index: &MovieIndex,
        search_text: Option<&str>,
        genre_name: &str,
    ) -> Vec<MovieId> {
        let pipeline = self.pipeline_for(search_text, genre_name);
        let ids: Vec<MovieId> = pipeline
            .apply(index)
            .into_iter()
            .filter_map(Movie::id)
            .collect();

        tracing::debug!(
            search = ?search_text,
            genre = genre_name,
            matches = ids.len(),
            "Resolved movie ids"
        );
        ids
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("scorer", &self.scorer.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Genre, NaiveDate, make_genre_association};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_index() -> MovieIndex {
        let mut index = MovieIndex::new();
        let mut action = Genre::new("Action");
        let mut drama = Genre::new("Drama");

        let mut guardians = Movie::new(date("2014-08-01"), "Guardians of the Galaxy").with_id(1);
        make_genre_association(&mut guardians, &mut action).unwrap();

        let mut prometheus = Movie::new(date("2012-06-08"), "Prometheus").with_id(2);
        make_genre_association(&mut prometheus, &mut drama).unwrap();

        let mut rise = Movie::new(date("2017-01-13"), "Rise of the Guardians").with_id(3);
        make_genre_association(&mut rise, &mut drama).unwrap();

        index.insert(guardians).unwrap();
        index.insert(prometheus).unwrap();
        index.insert(rise).unwrap();
        index
    }

    #[test]
    fn test_search_across_all_genres() {
        let index = create_test_index();
        let engine = QueryEngine::new();

        assert_eq!(engine.ids_for_genre(&index, Some("Guardians"), ALL_GENRES), vec![1, 3]);
        assert!(engine.ids_for_genre(&index, Some("xyz-nomatch"), ALL_GENRES).is_empty());
    }

    #[test]
    fn test_search_within_genre() {
        let index = create_test_index();
        let engine = QueryEngine::new();

        assert_eq!(engine.ids_for_genre(&index, Some("Guardians"), "Drama"), vec![3]);
        assert!(engine.ids_for_genre(&index, Some("Guardians"), "Comedy").is_empty());
    }

    #[test]
    fn test_genre_without_search() {
        let index = create_test_index();
        let engine = QueryEngine::new();

        assert_eq!(engine.ids_for_genre(&index, None, "Drama"), vec![2, 3]);
        assert!(engine.ids_for_genre(&index, None, "United States").is_empty());
    }

    #[test]
    fn test_all_without_search_returns_date_order() {
        let index = create_test_index();
        let engine = QueryEngine::new();

        assert_eq!(engine.ids_for_genre(&index, None, ALL_GENRES), vec![2, 1, 3]);
        assert!(engine.ids_for_genre(&MovieIndex::new(), None, ALL_GENRES).is_empty());
    }

    #[test]
    fn test_pipeline_shape() {
        let engine = QueryEngine::new();

        assert_eq!(engine.pipeline_for(None, ALL_GENRES).len(), 0);
        assert_eq!(engine.pipeline_for(Some("x"), ALL_GENRES).len(), 1);
        assert_eq!(engine.pipeline_for(None, "Drama").len(), 1);
        assert_eq!(engine.pipeline_for(Some("x"), "Drama").len(), 2);
    }

    #[test]
    fn test_threshold_can_be_tightened() {
        let index = create_test_index();
        let strict = QueryEngine::new().with_threshold(99);

        assert_eq!(strict.threshold(), 99);
        // Typo no longer passes
        assert!(strict.ids_for_genre(&index, Some("Guardains"), ALL_GENRES).is_empty());
        assert_eq!(strict.ids_for_genre(&index, Some("Guardians"), ALL_GENRES), vec![1, 3]);
    }
}
