//! Populate a repository from the CSV seed files.
//!
//! Steps:
//! 1. Parse movies, users and reviews in parallel
//! 2. Store the movies
//! 3. Create genres in first-seen order and associate them
//! 4. Hash passwords (in parallel) and store the users
//! 5. Attach each review to its user and movie, then store it

use crate::config::StoreConfig;
use crate::error::Result;
use crate::repository::MemoryRepository;
use catalog::parser::{self, MovieRecord, ReviewRecord, UserRecord};
use catalog::{CatalogError, Genre, MovieId, User, make_genre_association};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Entity counts after a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub movies: usize,
    pub genres: usize,
    pub users: usize,
    pub reviews: usize,
}

/// Loads the seed files found in `data_dir` into `repo`.
///
/// Fails on the first malformed row, duplicate id or username, or review
/// that refers to an unknown user or movie. The load runs against a copy of
/// `repo` that replaces it only on success, so a failed load leaves `repo`
/// as it was.
pub fn populate(
    data_dir: &Path,
    repo: &mut MemoryRepository,
    config: &StoreConfig,
) -> Result<LoadSummary> {
    let start = Instant::now();
    info!("Loading review catalog from {:?}", data_dir);

    let movies_path = config.movies_path(data_dir);
    let users_path = config.users_path(data_dir);
    let reviews_path = config.reviews_path(data_dir);

    let ((movies, users), reviews) = rayon::join(
        || {
            rayon::join(
                || parser::parse_movies(&movies_path),
                || parser::parse_users(&users_path),
            )
        },
        || parser::parse_reviews(&reviews_path),
    );
    let movies = movies?;
    let users = users?;
    let reviews = reviews?;

    let mut staged = repo.clone();
    let genres = load_movies(movies, &mut staged)?;
    let user_count = users.len();
    let usernames = load_users(users, &mut staged, config.password_cost)?;
    let review_count = reviews.len();
    load_reviews(reviews, &usernames, &mut staged)?;
    *repo = staged;

    let summary = LoadSummary {
        movies: repo.get_number_of_movies(),
        genres,
        users: user_count,
        reviews: review_count,
    };
    info!(
        "Loaded {} movies, {} genres, {} users, {} reviews in {:?}",
        summary.movies,
        summary.genres,
        summary.users,
        summary.reviews,
        start.elapsed()
    );
    Ok(summary)
}

/// Stores movies and their genres. Returns the number of genres created.
fn load_movies(records: Vec<MovieRecord>, repo: &mut MemoryRepository) -> Result<usize> {
    let mut genre_ids: Vec<(String, Vec<MovieId>)> = Vec::new();
    let mut genre_slots: HashMap<String, usize> = HashMap::new();

    for record in &records {
        repo.add_movie(record.to_movie())?;
        for name in &record.genres {
            let slot = *genre_slots.entry(name.clone()).or_insert_with(|| {
                genre_ids.push((name.clone(), Vec::new()));
                genre_ids.len() - 1
            });
            genre_ids[slot].1.push(record.id);
        }
    }

    let count = genre_ids.len();
    for (name, movie_ids) in genre_ids {
        let mut genre = Genre::new(name);
        for id in movie_ids {
            let movie = repo.get_movie_mut(id).ok_or_else(|| CatalogError::MissingReference {
                entity: "Movie".to_string(),
                key: id.to_string(),
            })?;
            make_genre_association(movie, &mut genre)?;
        }
        repo.add_genre(genre)?;
    }
    Ok(count)
}

/// Stores users with hashed passwords. Returns external id to username.
fn load_users(
    records: Vec<UserRecord>,
    repo: &mut MemoryRepository,
    cost: u32,
) -> Result<HashMap<String, String>> {
    let hashed: Vec<(UserRecord, String)> = records
        .into_par_iter()
        .map(|record| {
            let hash = bcrypt::hash(&record.password, cost)?;
            Ok((record, hash))
        })
        .collect::<Result<_>>()?;

    let mut usernames = HashMap::with_capacity(hashed.len());
    for (record, hash) in hashed {
        repo.add_user(User::new(record.username.clone(), hash))?;
        usernames.insert(record.external_id, record.username);
    }
    Ok(usernames)
}

fn load_reviews(
    records: Vec<ReviewRecord>,
    usernames: &HashMap<String, String>,
    repo: &mut MemoryRepository,
) -> Result<()> {
    for record in records {
        let username = usernames.get(&record.user_external_id).ok_or_else(|| {
            CatalogError::MissingReference {
                entity: "User".to_string(),
                key: record.user_external_id.clone(),
            }
        })?;
        let review = repo.attach_review(username, record.movie_id, record.text, record.rating)?;
        repo.add_review(review)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use std::fs;
    use tempfile::TempDir;

    const MOVIES: &str = "\
Rank,Title,Genre,Description,Director,Actors,Year,Runtime (Minutes),Rating,Votes,Revenue (Millions),Metascore,Date,Link,Image
1,Guardians of the Galaxy,\"Action,Adventure\",A group of criminals.,James Gunn,\"Chris Pratt, Zoe Saldana\",2014,121,8.1,757074,333.13,76,2014-08-01,https://example.org/1,https://example.org/1.jpg
2,Prometheus,\"Adventure,Mystery\",Following clues.,Ridley Scott,Noomi Rapace,2012,124,7,485820,126.46,65,2012-06-08,https://example.org/2,https://example.org/2.jpg
";
    const USERS: &str = "id,username,password\n1,thorke,cLQ^C#oFXloS\n2,fmercury,mvNNbc1eLA$i\n";
    const REVIEWS: &str = "id,user_id,movie_id,comment,timestamp,rating\n1,2,1,Great soundtrack,2020-02-28 14:31:26,9\n";

    fn write_fixture(movies: &str, users: &str, reviews: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Data1000Movies.csv"), movies).unwrap();
        fs::write(dir.path().join("users.csv"), users).unwrap();
        fs::write(dir.path().join("comments.csv"), reviews).unwrap();
        dir
    }

    fn test_config() -> StoreConfig {
        StoreConfig {
            password_cost: 4,
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_populate() {
        let dir = write_fixture(MOVIES, USERS, REVIEWS);
        let mut repo = MemoryRepository::new();

        let summary = populate(dir.path(), &mut repo, &test_config()).unwrap();

        assert_eq!(
            summary,
            LoadSummary { movies: 2, genres: 3, users: 2, reviews: 1 }
        );
        let names: Vec<&str> = repo.get_genres().iter().map(Genre::name).collect();
        assert_eq!(names, vec!["Action", "Adventure", "Mystery"]);
        assert_eq!(repo.get_genre("Adventure").unwrap().movie_ids(), &[1, 2]);
        assert_eq!(repo.get_movie(1).unwrap().number_of_reviews(), 1);
        assert_eq!(repo.get_user("fmercury").unwrap().reviews().len(), 1);
    }

    #[test]
    fn test_passwords_are_hashed() {
        let dir = write_fixture(MOVIES, USERS, REVIEWS);
        let mut repo = MemoryRepository::new();

        populate(dir.path(), &mut repo, &test_config()).unwrap();

        let stored = repo.get_user("thorke").unwrap().password();
        assert_ne!(stored, "cLQ^C#oFXloS");
        assert!(bcrypt::verify("cLQ^C#oFXloS", stored).unwrap());
    }

    #[test]
    fn test_review_for_unknown_user_fails() {
        let reviews = "id,user_id,movie_id,comment,timestamp,rating\n1,7,1,Who am I,2020-02-28 14:31:26,3\n";
        let dir = write_fixture(MOVIES, USERS, reviews);
        let mut repo = MemoryRepository::new();

        let err = populate(dir.path(), &mut repo, &test_config()).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Catalog(CatalogError::MissingReference { ref entity, .. }) if entity == "User"
        ));
    }

    #[test]
    fn test_review_for_unknown_movie_fails() {
        let reviews = "id,user_id,movie_id,comment,timestamp,rating\n1,1,42,Lost,2020-02-28 14:31:26,3\n";
        let dir = write_fixture(MOVIES, USERS, reviews);
        let mut repo = MemoryRepository::new();

        let err = populate(dir.path(), &mut repo, &test_config()).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Catalog(CatalogError::MissingReference { ref entity, .. }) if entity == "Movie"
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut repo = MemoryRepository::new();

        assert!(populate(dir.path(), &mut repo, &test_config()).is_err());
        assert_eq!(repo.get_number_of_movies(), 0);
    }

    #[test]
    fn test_failed_review_load_leaves_repository_unchanged() {
        let reviews = "id,user_id,movie_id,comment,timestamp,rating\n1,1,42,Lost,2020-02-28 14:31:26,3\n";
        let dir = write_fixture(MOVIES, USERS, reviews);
        let mut repo = MemoryRepository::new();
        repo.add_user(User::new("existing", "hash")).unwrap();

        assert!(populate(dir.path(), &mut repo, &test_config()).is_err());

        assert_eq!(repo.get_number_of_movies(), 0);
        assert!(repo.get_genres().is_empty());
        assert_eq!(repo.get_number_of_users(), 1);
        assert!(repo.get_user("thorke").is_none());
        assert!(repo.get_reviews().is_empty());
    }
}
