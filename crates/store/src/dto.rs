//! Serializable views handed out by the service layer.
//!
//! Views own their data, so they can outlive the repository borrow they
//! were built from.

use catalog::{Genre, Movie, MovieId, NaiveDate, Review, User};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// Minimal movie card for lists and pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: Option<MovieId>,
    pub title: String,
    pub date: NaiveDate,
    pub image_hyperlink: String,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id(),
            title: movie.title().to_string(),
            date: movie.date(),
            image_hyperlink: movie.image_hyperlink().to_string(),
        }
    }
}

/// Everything shown on a movie's own page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub id: Option<MovieId>,
    pub title: String,
    pub year: i32,
    pub date: NaiveDate,
    pub synopsis: String,
    pub hyperlink: String,
    pub image_hyperlink: String,
    pub back_hyperlink: String,
    pub director: String,
    pub actors: Vec<String>,
    pub runtime: u32,
    pub rating: f32,
    pub genres: Vec<GenreView>,
    pub reviews: Vec<ReviewView>,
}

impl From<&Movie> for MovieDetail {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id(),
            title: movie.title().to_string(),
            year: movie.date().year(),
            date: movie.date(),
            synopsis: movie.synopsis().to_string(),
            hyperlink: movie.hyperlink().to_string(),
            image_hyperlink: movie.image_hyperlink().to_string(),
            back_hyperlink: movie.back_hyperlink().to_string(),
            director: movie.director().to_string(),
            actors: movie.actors().to_vec(),
            runtime: movie.runtime(),
            rating: movie.rating(),
            genres: movie
                .genres()
                .iter()
                .map(|name| GenreView { name: name.clone() })
                .collect(),
            reviews: movie.reviews().iter().map(ReviewView::from).collect(),
        }
    }
}

/// Card for "more like this" lists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMovie {
    pub id: Option<MovieId>,
    pub title: String,
    pub genres: Vec<String>,
    pub director: String,
    pub image_hyperlink: String,
}

impl From<&Movie> for SimilarMovie {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id(),
            title: movie.title().to_string(),
            genres: movie.genres().to_vec(),
            director: movie.director().to_string(),
            image_hyperlink: movie.image_hyperlink().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub username: String,
    pub movie_id: Option<MovieId>,
    pub text: String,
    pub rating: i32,
    pub timestamp: DateTime<Utc>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            username: review.user().unwrap_or_default().to_string(),
            movie_id: review.movie_id(),
            text: review.text().to_string(),
            rating: review.rating(),
            timestamp: review.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreView {
    pub name: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name().to_string(),
        }
    }
}

/// Stored user. `password` is the bcrypt hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub username: String,
    pub password: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            password: user.password().to_string(),
        }
    }
}

/// Movies released on one date, with the neighbouring release dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePage {
    pub date: NaiveDate,
    pub movies: Vec<MovieSummary>,
    pub previous_date: Option<NaiveDate>,
    pub next_date: Option<NaiveDate>,
}

/// One page of a genre/search listing.
///
/// Cursors are offsets into the full id list; `None` means there is no such
/// page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenrePage {
    pub genre: String,
    pub search: Option<String>,
    pub total: usize,
    pub movies: Vec<MovieSummary>,
    pub first_cursor: Option<usize>,
    pub previous_cursor: Option<usize>,
    pub next_cursor: Option<usize>,
    pub last_cursor: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::make_review;

    #[test]
    fn test_movie_detail_copies_associations() {
        let mut user = User::new("fmercury", "hash");
        let mut movie = Movie::new(NaiveDate::from_ymd_opt(2014, 8, 1).unwrap(), "Guardians")
            .with_id(1)
            .with_runtime(121);
        make_review(&mut user, &mut movie, "Great soundtrack", 9);

        let detail = MovieDetail::from(&movie);

        assert_eq!(detail.year, 2014);
        assert_eq!(detail.runtime, 121);
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].username, "fmercury");
        assert_eq!(detail.reviews[0].movie_id, Some(1));
    }

    #[test]
    fn test_summary_serializes_date_as_iso() {
        let movie = Movie::new(NaiveDate::from_ymd_opt(2012, 6, 8).unwrap(), "Prometheus")
            .with_id(2)
            .with_image_hyperlink("https://example.org/2.jpg");

        let json = serde_json::to_value(MovieSummary::from(&movie)).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["date"], "2012-06-08");
        assert_eq!(json["image_hyperlink"], "https://example.org/2.jpg");
    }
}
