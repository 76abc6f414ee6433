//! Filter to keep only movies carrying a named genre.

use crate::traits::MovieFilter;
use catalog::Movie;

/// Keeps movies whose attached genre names include `genre_name`.
///
/// ## Algorithm
/// Exact, case-sensitive string equality against each attached genre name.
pub struct GenreFilter {
    genre_name: String,
}

impl GenreFilter {
    pub fn new(genre_name: impl Into<String>) -> Self {
        Self {
            genre_name: genre_name.into(),
        }
    }
}

impl MovieFilter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn matches(&self, movie: &Movie) -> bool {
        movie.has_genre(&self.genre_name)
    }
}
