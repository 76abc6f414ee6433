//! # In-memory repository
//!
//! `MemoryRepository` is the single owner of every entity: the date-ordered
//! movie index, users keyed by username, genres in insertion order and the
//! list of accepted reviews. All reads hand out shared borrows or freshly
//! built `Vec`s, so nothing can be mutated while a caller is iterating.
//!
//! Associations between stored entities are made through the repository
//! (`associate_genre`, `attach_review`) because both sides live inside it.

use catalog::{
    CatalogError, Genre, Movie, MovieId, MovieIndex, NaiveDate, Result, Review, User,
    make_genre_association, make_review,
};
use query::QueryEngine;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    movies: MovieIndex,
    users: HashMap<String, User>,
    genres: Vec<Genre>,
    reviews: Vec<Review>,
    query: QueryEngine,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository whose genre/search queries run through `query`
    pub fn with_query_engine(query: QueryEngine) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn query_engine(&self) -> &QueryEngine {
        &self.query
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn add_user(&mut self, user: User) -> Result<()> {
        if self.users.contains_key(user.username()) {
            return Err(CatalogError::DuplicateUsername(user.username().to_string()));
        }
        debug!(username = user.username(), "Adding user");
        self.users.insert(user.username().to_string(), user);
        Ok(())
    }

    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Mutable access for attaching reviews built outside the repository
    pub fn get_user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.get_mut(username)
    }

    pub fn get_number_of_users(&self) -> usize {
        self.users.len()
    }

    // =========================================================================
    // Movies
    // =========================================================================

    /// Stores `movie` in date order. The movie must carry a unique id.
    pub fn add_movie(&mut self, movie: Movie) -> Result<()> {
        self.movies.insert(movie)
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(id)
    }

    pub fn get_movie_mut(&mut self, id: MovieId) -> Option<&mut Movie> {
        self.movies.get_mut(id)
    }

    /// Movie whose rank matches `rank`. The rank is the first column of
    /// the movies file, which is also the movie's id.
    pub fn get_movie_by_rank(&self, rank: MovieId) -> Option<&Movie> {
        self.movies.get(rank)
    }

    /// Movie at a 0-based position in release-date order
    pub fn get_movie_at_position(&self, position: usize) -> Option<&Movie> {
        self.movies.at_position(position)
    }

    /// Stored movies for `ids`, in the order given. Unknown ids are skipped.
    pub fn get_movies_by_id(&self, ids: &[MovieId]) -> Vec<&Movie> {
        self.movies.get_by_ids(ids)
    }

    /// Movies released on `date`, in insertion order
    pub fn get_movies_by_date(&self, date: NaiveDate) -> Vec<&Movie> {
        self.movies.movies_on(date)
    }

    pub fn get_number_of_movies(&self) -> usize {
        self.movies.len()
    }

    pub fn get_first_movie(&self) -> Option<&Movie> {
        self.movies.first()
    }

    pub fn get_last_movie(&self) -> Option<&Movie> {
        self.movies.last()
    }

    /// Latest release date strictly before `movie`'s. `movie` need not be
    /// stored.
    pub fn get_date_of_previous_movie(&self, movie: &Movie) -> Option<NaiveDate> {
        self.movies.date_of_previous(movie)
    }

    /// Earliest release date strictly after `movie`'s
    pub fn get_date_of_next_movie(&self, movie: &Movie) -> Option<NaiveDate> {
        self.movies.date_of_next(movie)
    }

    /// Date-ordered ids of the movies matching `search_text` and
    /// `genre_name` (`"all"` for every genre)
    pub fn get_movie_ids_for_genre(
        &self,
        search_text: Option<&str>,
        genre_name: &str,
    ) -> Vec<MovieId> {
        self.query.ids_for_genre(&self.movies, search_text, genre_name)
    }

    /// Every stored movie in release-date order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> + '_ {
        self.movies.iter()
    }

    // =========================================================================
    // Genres
    // =========================================================================

    pub fn add_genre(&mut self, genre: Genre) -> Result<()> {
        if self.get_genre(genre.name()).is_some() {
            return Err(CatalogError::DuplicateGenre(genre.name().to_string()));
        }
        debug!(genre = genre.name(), "Adding genre");
        self.genres.push(genre);
        Ok(())
    }

    pub fn get_genre(&self, name: &str) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.name() == name)
    }

    /// Genres in the order they were added
    pub fn get_genres(&self) -> &[Genre] {
        &self.genres
    }

    /// Applies a stored genre to a stored movie on both sides
    pub fn associate_genre(&mut self, movie_id: MovieId, genre_name: &str) -> Result<()> {
        let movie = self
            .movies
            .get_mut(movie_id)
            .ok_or_else(|| missing("Movie", movie_id))?;
        let genre = self
            .genres
            .iter_mut()
            .find(|genre| genre.name() == genre_name)
            .ok_or_else(|| missing("Genre", genre_name))?;

        make_genre_association(movie, genre)
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Creates a review by `username` of movie `movie_id` and attaches it to
    /// both. The review still has to be passed to [`add_review`] to be
    /// listed by the repository.
    ///
    /// [`add_review`]: MemoryRepository::add_review
    pub fn attach_review(
        &mut self,
        username: &str,
        movie_id: MovieId,
        text: impl Into<String>,
        rating: i32,
    ) -> Result<Review> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| missing("User", username))?;
        let movie = self
            .movies
            .get_mut(movie_id)
            .ok_or_else(|| missing("Movie", movie_id))?;

        Ok(make_review(user, movie, text, rating))
    }

    /// Accepts `review` only if its user and its movie are stored and both
    /// already list it. On failure the review list is left unchanged.
    pub fn add_review(&mut self, review: Review) -> Result<()> {
        let attached_to_user = review
            .user()
            .and_then(|username| self.users.get(username))
            .is_some_and(|user| user.reviews().contains(&review));
        if !attached_to_user {
            warn!(user = ?review.user(), "Rejected review without a user back-reference");
            return Err(CatalogError::InvalidAssociation(
                "Review not correctly attached to a User".to_string(),
            ));
        }

        let attached_to_movie = review
            .movie_id()
            .and_then(|id| self.movies.get(id))
            .is_some_and(|movie| movie.reviews().contains(&review));
        if !attached_to_movie {
            warn!(movie = ?review.movie_id(), "Rejected review without a movie back-reference");
            return Err(CatalogError::InvalidAssociation(
                "Review not correctly attached to a Movie".to_string(),
            ));
        }

        self.reviews.push(review);
        Ok(())
    }

    /// Accepted reviews in insertion order
    pub fn get_reviews(&self) -> &[Review] {
        &self.reviews
    }
}

fn missing(entity: &str, key: impl ToString) -> CatalogError {
    CatalogError::MissingReference {
        entity: entity.to_string(),
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query::ALL_GENRES;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_repository() -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        let rows = [
            (1, "2014-08-01", "Guardians of the Galaxy"),
            (2, "2012-06-08", "Prometheus"),
            (3, "2016-08-19", "Split"),
            (4, "2016-08-19", "Sing"),
        ];
        for (id, day, title) in rows {
            repo.add_movie(Movie::new(date(day), title).with_id(id)).unwrap();
        }
        repo.add_user(User::new("fmercury", "mvNNbc1eLA$i")).unwrap();
        repo.add_genre(Genre::new("Action")).unwrap();
        repo.add_genre(Genre::new("Horror")).unwrap();
        repo
    }

    #[test]
    fn test_users() {
        let mut repo = create_test_repository();

        assert_eq!(repo.get_user("fmercury").unwrap().password(), "mvNNbc1eLA$i");
        assert!(repo.get_user("prince").is_none());

        let err = repo.add_user(User::new("fmercury", "other")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateUsername(name) if name == "fmercury"));
        assert_eq!(repo.get_number_of_users(), 1);
    }

    #[test]
    fn test_movies_by_date_and_rank() {
        let repo = create_test_repository();

        assert_eq!(repo.get_number_of_movies(), 4);
        assert_eq!(repo.get_first_movie().unwrap().title(), "Prometheus");
        assert_eq!(repo.get_last_movie().unwrap().title(), "Sing");
        assert_eq!(repo.get_movie_by_rank(2).unwrap().title(), "Prometheus");
        assert_eq!(repo.get_movie_by_rank(1).unwrap().title(), "Guardians of the Galaxy");
        assert!(repo.get_movie_by_rank(0).is_none());
        assert_eq!(repo.get_movie_at_position(0).unwrap().id(), Some(2));
        assert_eq!(repo.get_movie_at_position(1).unwrap().id(), Some(1));
        assert!(repo.get_movie_at_position(4).is_none());

        let titles: Vec<&str> = repo
            .get_movies_by_date(date("2016-08-19"))
            .into_iter()
            .map(Movie::title)
            .collect();
        assert_eq!(titles, vec!["Split", "Sing"]);
        assert!(repo.get_movies_by_date(date("2020-01-01")).is_empty());
    }

    #[test]
    fn test_neighbor_dates() {
        let repo = create_test_repository();
        let guardians = repo.get_movie(1).unwrap();

        assert_eq!(repo.get_date_of_previous_movie(guardians), Some(date("2012-06-08")));
        assert_eq!(repo.get_date_of_next_movie(guardians), Some(date("2016-08-19")));
        assert_eq!(repo.get_date_of_previous_movie(repo.get_first_movie().unwrap()), None);
        assert_eq!(repo.get_date_of_next_movie(repo.get_last_movie().unwrap()), None);

        let unstored = Movie::new(date("2015-01-01"), "Unreleased");
        assert_eq!(repo.get_date_of_next_movie(&unstored), Some(date("2016-08-19")));
    }

    #[test]
    fn test_movies_by_id_skips_unknown() {
        let repo = create_test_repository();

        let ids: Vec<Option<MovieId>> = repo
            .get_movies_by_id(&[3, 99, 1])
            .into_iter()
            .map(Movie::id)
            .collect();

        assert_eq!(ids, vec![Some(3), Some(1)]);
    }

    #[test]
    fn test_genres() {
        let mut repo = create_test_repository();

        repo.associate_genre(3, "Horror").unwrap();
        repo.associate_genre(4, "Horror").unwrap();

        let names: Vec<&str> = repo.get_genres().iter().map(Genre::name).collect();
        assert_eq!(names, vec!["Action", "Horror"]);
        assert_eq!(repo.get_genre("Horror").unwrap().movie_ids(), &[3, 4]);
        assert!(repo.get_movie(3).unwrap().has_genre("Horror"));
        assert_eq!(repo.get_movie_ids_for_genre(None, "Horror"), vec![3, 4]);
        assert_eq!(repo.get_movie_ids_for_genre(None, ALL_GENRES).len(), 4);

        assert!(matches!(
            repo.add_genre(Genre::new("Action")),
            Err(CatalogError::DuplicateGenre(_))
        ));
        assert!(matches!(
            repo.associate_genre(3, "Horror"),
            Err(CatalogError::DuplicateAssociation { .. })
        ));
        assert!(matches!(
            repo.associate_genre(3, "Western"),
            Err(CatalogError::MissingReference { .. })
        ));
    }

    #[test]
    fn test_fuzzy_search_through_repository() {
        let repo = create_test_repository();

        assert_eq!(repo.get_movie_ids_for_genre(Some("Guardians"), ALL_GENRES), vec![1]);
        assert!(repo.get_movie_ids_for_genre(Some("Guardians"), "Action").is_empty());
    }

    #[test]
    fn test_attached_review_is_accepted() {
        let mut repo = create_test_repository();

        let review = repo.attach_review("fmercury", 1, "Great soundtrack", 9).unwrap();
        repo.add_review(review.clone()).unwrap();

        assert_eq!(repo.get_reviews(), &[review.clone()]);
        assert!(repo.get_user("fmercury").unwrap().reviews().contains(&review));
        assert_eq!(repo.get_movie(1).unwrap().number_of_reviews(), 1);
    }

    #[test]
    fn test_attach_review_requires_stored_entities() {
        let mut repo = create_test_repository();

        assert!(matches!(
            repo.attach_review("prince", 1, "text", 5),
            Err(CatalogError::MissingReference { .. })
        ));
        assert!(matches!(
            repo.attach_review("fmercury", 99, "text", 5),
            Err(CatalogError::MissingReference { .. })
        ));
    }

    #[test]
    fn test_unattached_review_is_rejected() {
        let mut repo = create_test_repository();
        let user = repo.get_user("fmercury").unwrap().clone();
        let movie = repo.get_movie(1).unwrap().clone();

        let review = Review::new(Some(&user), Some(&movie), "Loved it", 8);
        let err = repo.add_review(review).unwrap_err();

        assert!(matches!(err, CatalogError::InvalidAssociation(msg) if msg.contains("User")));
        assert!(repo.get_reviews().is_empty());
    }

    #[test]
    fn test_review_attached_to_user_only_is_rejected() {
        let mut repo = create_test_repository();
        let user = repo.get_user("fmercury").unwrap().clone();
        let movie = repo.get_movie(1).unwrap().clone();

        let review = Review::new(Some(&user), Some(&movie), "Loved it", 8);
        repo.get_user_mut("fmercury").unwrap().add_review(review.clone());
        let err = repo.add_review(review.clone()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAssociation(msg) if msg.contains("Movie")));
        assert!(repo.get_reviews().is_empty());

        repo.get_movie_mut(1).unwrap().add_review(review.clone());
        repo.add_review(review).unwrap();
        assert_eq!(repo.get_reviews().len(), 1);
    }

    #[test]
    fn test_review_without_user_is_rejected() {
        let mut repo = create_test_repository();
        let movie = repo.get_movie(1).unwrap().clone();

        let review = Review::new(None, Some(&movie), "Anonymous", 5);

        assert!(repo.add_review(review).is_err());
    }
}
