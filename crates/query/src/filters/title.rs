//! Filter to keep movies whose title fuzzy-matches a search term.

use crate::traits::{MovieFilter, SimilarityScorer};
use catalog::Movie;
use std::sync::Arc;

/// Keeps movies whose title scores strictly above `threshold`.
pub struct TitleFilter {
    search_text: String,
    scorer: Arc<dyn SimilarityScorer>,
    threshold: u8,
}

impl TitleFilter {
    /// Create a new TitleFilter.
    ///
    /// # Arguments
    /// * `search_text` - Free-text search term
    /// * `scorer` - Shared similarity scorer
    /// * `threshold` - Minimum score to exceed (typically 70)
    pub fn new(
        search_text: impl Into<String>,
        scorer: Arc<dyn SimilarityScorer>,
        threshold: u8,
    ) -> Self {
        Self {
            search_text: search_text.into(),
            scorer,
            threshold,
        }
    }
}

impl MovieFilter for TitleFilter {
    fn name(&self) -> &str {
        "TitleFilter"
    }

    fn matches(&self, movie: &Movie) -> bool {
        self.scorer.score(&self.search_text, movie.title()) > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::PartialRatio;
    use catalog::NaiveDate;

    fn titled(title: &str) -> Movie {
        Movie::new(NaiveDate::from_ymd_opt(2014, 8, 1).unwrap(), title).with_id(1)
    }

    /// Scores by exact equality only
    struct ExactScorer;

    impl SimilarityScorer for ExactScorer {
        fn name(&self) -> &str {
            "ExactScorer"
        }

        fn score(&self, query: &str, candidate: &str) -> u8 {
            if query == candidate { 100 } else { 0 }
        }
    }

    #[test]
    fn test_title_filter() {
        let filter = TitleFilter::new("Guardians", Arc::new(PartialRatio), 70);

        assert!(filter.matches(&titled("Guardians of the Galaxy")));
        assert!(!filter.matches(&titled("Prometheus")));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // "abcd" vs "abce" scores exactly 75
        let at_threshold = TitleFilter::new("abcd", Arc::new(PartialRatio), 75);
        let below_threshold = TitleFilter::new("abcd", Arc::new(PartialRatio), 74);

        assert!(!at_threshold.matches(&titled("abce")));
        assert!(below_threshold.matches(&titled("abce")));
    }

    #[test]
    fn test_scorer_is_pluggable() {
        let filter = TitleFilter::new("Guardians", Arc::new(ExactScorer), 70);

        assert!(!filter.matches(&titled("Guardians of the Galaxy")));
        assert!(filter.matches(&titled("Guardians")));
    }
}
