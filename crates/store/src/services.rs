//! Service layer: validated operations over a `MemoryRepository` that
//! return owned views instead of entity borrows.
//!
//! Every function takes the repository explicitly. Misses that a caller
//! asked for by key (`get_movie`, `get_user`, ...) are errors; listings that
//! come up empty are just empty.

use crate::dto::{DatePage, GenrePage, MovieDetail, MovieSummary, ReviewView, SimilarMovie, UserView};
use crate::error::{Result, ServiceError};
use crate::repository::MemoryRepository;
use catalog::{Genre, MovieId, NaiveDate, User};
use rand::Rng;
use tracing::info;

// =============================================================================
// Users
// =============================================================================

/// Registers a user, storing a bcrypt hash of `password` at `cost`
pub fn add_user(
    username: &str,
    password: &str,
    cost: u32,
    repo: &mut MemoryRepository,
) -> Result<()> {
    if repo.get_user(username).is_some() {
        return Err(ServiceError::NameNotUnique(username.to_string()));
    }

    let hash = bcrypt::hash(password, cost)?;
    repo.add_user(User::new(username, hash))?;
    info!(username, "Registered user");
    Ok(())
}

pub fn get_user(username: &str, repo: &MemoryRepository) -> Result<UserView> {
    repo.get_user(username)
        .map(UserView::from)
        .ok_or_else(|| ServiceError::UnknownUser(username.to_string()))
}

/// Checks `password` against the stored hash
pub fn authenticate_user(username: &str, password: &str, repo: &MemoryRepository) -> Result<()> {
    let user = repo.get_user(username).ok_or(ServiceError::Authentication)?;
    if bcrypt::verify(password, user.password())? {
        Ok(())
    } else {
        Err(ServiceError::Authentication)
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Reviews movie `movie_id` as `username`
pub fn add_review(
    movie_id: MovieId,
    text: &str,
    username: &str,
    rating: i32,
    repo: &mut MemoryRepository,
) -> Result<ReviewView> {
    if repo.get_movie(movie_id).is_none() {
        return Err(ServiceError::NonExistentMovie(movie_id));
    }
    if repo.get_user(username).is_none() {
        return Err(ServiceError::UnknownUser(username.to_string()));
    }

    let review = repo.attach_review(username, movie_id, text, rating)?;
    let view = ReviewView::from(&review);
    repo.add_review(review)?;
    Ok(view)
}

pub fn get_reviews_for_movie(movie_id: MovieId, repo: &MemoryRepository) -> Result<Vec<ReviewView>> {
    let movie = repo
        .get_movie(movie_id)
        .ok_or(ServiceError::NonExistentMovie(movie_id))?;
    Ok(movie.reviews().iter().map(ReviewView::from).collect())
}

// =============================================================================
// Movies
// =============================================================================

pub fn get_movie(movie_id: MovieId, repo: &MemoryRepository) -> Result<MovieDetail> {
    repo.get_movie(movie_id)
        .map(MovieDetail::from)
        .ok_or(ServiceError::NonExistentMovie(movie_id))
}

/// Movie carrying `rank` in the first column of the movies file
pub fn get_movie_by_rank(rank: MovieId, repo: &MemoryRepository) -> Result<MovieDetail> {
    repo.get_movie_by_rank(rank)
        .map(MovieDetail::from)
        .ok_or(ServiceError::NonExistentRank(rank))
}

pub fn get_first_movie(repo: &MemoryRepository) -> Option<MovieDetail> {
    repo.get_first_movie().map(MovieDetail::from)
}

pub fn get_last_movie(repo: &MemoryRepository) -> Option<MovieDetail> {
    repo.get_last_movie().map(MovieDetail::from)
}

/// Movies released on `date` and the release dates either side of it.
///
/// The neighbour dates are only filled in when something was released on
/// `date`.
pub fn get_movies_by_date(date: NaiveDate, repo: &MemoryRepository) -> DatePage {
    let movies = repo.get_movies_by_date(date);

    let (previous_date, next_date) = match movies.first() {
        Some(first) => (
            repo.get_date_of_previous_movie(first),
            repo.get_date_of_next_movie(first),
        ),
        None => (None, None),
    };

    DatePage {
        date,
        movies: movies.into_iter().map(MovieSummary::from).collect(),
        previous_date,
        next_date,
    }
}

/// Date-ordered ids for a genre (`"all"` for every genre), optionally
/// narrowed by a fuzzy title search. Blank search text means no search.
pub fn get_movie_ids_for_genre(
    search: Option<&str>,
    genre_name: &str,
    repo: &MemoryRepository,
) -> Vec<MovieId> {
    let search = search.map(str::trim).filter(|text| !text.is_empty());
    repo.get_movie_ids_for_genre(search, genre_name)
}

pub fn get_movies_by_id(ids: &[MovieId], repo: &MemoryRepository) -> Vec<MovieSummary> {
    repo.get_movies_by_id(ids)
        .into_iter()
        .map(MovieSummary::from)
        .collect()
}

pub fn get_similar_movies(ids: &[MovieId], repo: &MemoryRepository) -> Vec<SimilarMovie> {
    repo.get_movies_by_id(ids)
        .into_iter()
        .map(SimilarMovie::from)
        .collect()
}

/// Up to `quantity` distinct movies picked at random
pub fn get_random_movies(quantity: usize, repo: &MemoryRepository) -> Vec<MovieSummary> {
    get_random_movies_with(&mut rand::rng(), quantity, repo)
}

/// [`get_random_movies`] with a caller-supplied generator
pub fn get_random_movies_with<R: Rng + ?Sized>(
    rng: &mut R,
    quantity: usize,
    repo: &MemoryRepository,
) -> Vec<MovieSummary> {
    let count = repo.get_number_of_movies();
    let amount = quantity.min(count);

    rand::seq::index::sample(rng, count, amount)
        .into_iter()
        .filter_map(|position| repo.get_movie_at_position(position))
        .map(MovieSummary::from)
        .collect()
}

// =============================================================================
// Genres
// =============================================================================

pub fn get_genre_names(repo: &MemoryRepository) -> Vec<String> {
    repo.get_genres()
        .iter()
        .map(Genre::name)
        .map(String::from)
        .collect()
}

/// One page of the movies in `genre_name` matching `search`, starting at
/// offset `cursor`.
///
/// Cursors for the other pages follow the listing view: previous and next
/// step by `per_page`, first is 0, and last is the start of the final
/// non-empty page.
pub fn browse_genre(
    genre_name: &str,
    search: Option<&str>,
    cursor: usize,
    per_page: usize,
    repo: &MemoryRepository,
) -> GenrePage {
    let per_page = per_page.max(1);
    let ids = get_movie_ids_for_genre(search, genre_name, repo);
    let total = ids.len();

    let start = cursor.min(total);
    let end = cursor.saturating_add(per_page).min(total);
    let movies = get_movies_by_id(&ids[start..end], repo);

    let (first_cursor, previous_cursor) = if cursor > 0 {
        (Some(0), Some(cursor.saturating_sub(per_page)))
    } else {
        (None, None)
    };

    let (next_cursor, last_cursor) = if cursor.saturating_add(per_page) < total {
        let mut last = per_page * (total / per_page);
        if total % per_page == 0 {
            last -= per_page;
        }
        (Some(cursor + per_page), Some(last))
    } else {
        (None, None)
    };

    GenrePage {
        genre: genre_name.to_string(),
        search: search.map(String::from),
        total,
        movies,
        first_cursor,
        previous_cursor,
        next_cursor,
        last_cursor,
    }
}
