//! Core domain types for the review catalog.
//!
//! Associations between entities are stored as keys, the same way a
//! `Rating` would carry a user id and a movie id: a review names its user by
//! username and its movie by id, a genre lists the ids of its movies and a
//! movie lists the names of its genres. The two helpers at the bottom of this
//! module, [`make_review`] and [`make_genre_association`], are the only way to
//! create a link on both sides at once.

use crate::error::{CatalogError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie, assigned by the data source
pub type MovieId = u32;

// =============================================================================
// User
// =============================================================================

/// A registered user. Two users are equal when their usernames are equal.
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    /// Already hashed by the caller; the catalog never inspects it
    password: String,
    reviews: Vec<Review>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            reviews: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Records a back-reference to a review written by this user
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User {} {}>", self.username, self.password)
    }
}

// =============================================================================
// Movie
// =============================================================================

/// A movie in the catalog.
///
/// Built with [`Movie::new`] and the `with_*` methods. Once built, only the
/// review and genre lists can change, which keeps the release date (the sort
/// key of the index) fixed for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct Movie {
    /// `None` until the movie has been assigned an id by the data source
    id: Option<MovieId>,
    date: NaiveDate,
    title: String,
    synopsis: String,
    hyperlink: String,
    image_hyperlink: String,
    back_hyperlink: String,
    rating: f32,
    /// Minutes
    runtime: u32,
    director: String,
    actors: Vec<String>,
    reviews: Vec<Review>,
    genres: Vec<String>,
}

impl Movie {
    pub fn new(date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            id: None,
            date,
            title: title.into(),
            synopsis: String::new(),
            hyperlink: String::new(),
            image_hyperlink: String::new(),
            back_hyperlink: String::new(),
            rating: 0.0,
            runtime: 0,
            director: String::new(),
            actors: Vec::new(),
            reviews: Vec::new(),
            genres: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: MovieId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    pub fn with_hyperlink(mut self, hyperlink: impl Into<String>) -> Self {
        self.hyperlink = hyperlink.into();
        self
    }

    pub fn with_image_hyperlink(mut self, image_hyperlink: impl Into<String>) -> Self {
        self.image_hyperlink = image_hyperlink.into();
        self
    }

    pub fn with_back_hyperlink(mut self, back_hyperlink: impl Into<String>) -> Self {
        self.back_hyperlink = back_hyperlink.into();
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_runtime(mut self, runtime: u32) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = director.into();
        self
    }

    pub fn with_actors(mut self, actors: Vec<String>) -> Self {
        self.actors = actors;
        self
    }

    pub fn id(&self) -> Option<MovieId> {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn hyperlink(&self) -> &str {
        &self.hyperlink
    }

    pub fn image_hyperlink(&self) -> &str {
        &self.image_hyperlink
    }

    pub fn back_hyperlink(&self) -> &str {
        &self.back_hyperlink
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn runtime(&self) -> u32 {
        self.runtime
    }

    pub fn director(&self) -> &str {
        &self.director
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn number_of_reviews(&self) -> usize {
        self.reviews.len()
    }

    /// Names of the genres applied to this movie, in association order
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn number_of_genres(&self) -> usize {
        self.genres.len()
    }

    pub fn has_genre(&self, genre_name: &str) -> bool {
        self.genres.iter().any(|name| name == genre_name)
    }

    pub fn is_genred_by(&self, genre: &Genre) -> bool {
        self.has_genre(genre.name())
    }

    pub fn is_genred(&self) -> bool {
        !self.genres.is_empty()
    }

    /// True when this movie sorts strictly before `other` (release date only)
    pub fn precedes(&self, other: &Movie) -> bool {
        self.date < other.date
    }

    /// Records a back-reference to a review of this movie
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub(crate) fn add_genre(&mut self, genre_name: String) {
        self.genres.push(genre_name);
    }
}

/// Content equality. The id is not compared, so an unsaved copy equals the
/// stored movie.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.title == other.title
            && self.synopsis == other.synopsis
            && self.hyperlink == other.hyperlink
            && self.image_hyperlink == other.image_hyperlink
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Movie {} {}>", self.date.format("%Y-%m-%d"), self.title)
    }
}

// =============================================================================
// Genre
// =============================================================================

/// A named genre and the ids of the movies it has been applied to
#[derive(Debug, Clone)]
pub struct Genre {
    name: String,
    movies: Vec<MovieId>,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn number_of_movies(&self) -> usize {
        self.movies.len()
    }

    pub fn is_applied_to(&self, movie: &Movie) -> bool {
        movie.id().is_some_and(|id| self.movies.contains(&id))
    }

    pub(crate) fn add_movie(&mut self, movie_id: MovieId) {
        self.movies.push(movie_id);
    }
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Genre {}

// =============================================================================
// Review
// =============================================================================

/// A user's review of a movie.
///
/// The user and movie references are fixed at construction. Either may be
/// absent (no user, or a movie without an id), in which case the repository
/// will refuse to store the review.
#[derive(Debug, Clone)]
pub struct Review {
    user: Option<String>,
    movie: Option<MovieId>,
    text: String,
    rating: i32,
    timestamp: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user: Option<&User>,
        movie: Option<&Movie>,
        text: impl Into<String>,
        rating: i32,
    ) -> Self {
        Self {
            user: user.map(|u| u.username().to_string()),
            movie: movie.and_then(Movie::id),
            text: text.into(),
            rating,
            timestamp: Utc::now(),
        }
    }

    /// Username of the author
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn movie_id(&self) -> Option<MovieId> {
        self.movie
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl PartialEq for Review {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
            && self.movie == other.movie
            && self.text == other.text
            && self.timestamp == other.timestamp
    }
}

// =============================================================================
// Association helpers
// =============================================================================

/// Creates a review and attaches it to both the user and the movie
pub fn make_review(
    user: &mut User,
    movie: &mut Movie,
    text: impl Into<String>,
    rating: i32,
) -> Review {
    let review = Review::new(Some(user), Some(movie), text, rating);
    user.add_review(review.clone());
    movie.add_review(review.clone());
    review
}

/// Applies `genre` to `movie` on both sides.
///
/// Fails without touching either value if the genre is already applied, or
/// if the movie has no id for the genre to refer to.
pub fn make_genre_association(movie: &mut Movie, genre: &mut Genre) -> Result<()> {
    let movie_id = movie.id().ok_or_else(|| CatalogError::UnsavedMovie {
        title: movie.title().to_string(),
    })?;

    if genre.is_applied_to(movie) || movie.is_genred_by(genre) {
        return Err(CatalogError::DuplicateAssociation {
            genre: genre.name().to_string(),
            title: movie.title().to_string(),
        });
    }

    movie.add_genre(genre.name().to_string());
    genre.add_movie(movie_id);
    Ok(())
}
