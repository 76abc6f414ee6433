//! Parsers for the CSV seed files.
//!
//! - movies: id, title, genres, synopsis, director, actors, year, runtime,
//!   rating, votes, revenue, metascore, date, back link, image link
//! - users: id, username, password
//! - reviews: id, user id, movie id, text, timestamp, rating
//!
//! Every file starts with a header row, and every field is trimmed. The
//! parsers only turn rows into records; building entities and linking them
//! is left to whoever owns the repository.

use crate::error::{CatalogError, Result};
use crate::types::{Movie, MovieId};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Column positions in the seed files
mod columns {
    pub const MOVIE_ID: usize = 0;
    pub const MOVIE_TITLE: usize = 1;
    pub const MOVIE_GENRES: usize = 2;
    pub const MOVIE_SYNOPSIS: usize = 3;
    pub const MOVIE_DIRECTOR: usize = 4;
    pub const MOVIE_ACTORS: usize = 5;
    pub const MOVIE_RUNTIME: usize = 7;
    pub const MOVIE_RATING: usize = 8;
    pub const MOVIE_DATE: usize = 12;
    pub const MOVIE_BACK_LINK: usize = 13;
    pub const MOVIE_IMAGE_LINK: usize = 14;

    pub const USER_ID: usize = 0;
    pub const USER_NAME: usize = 1;
    pub const USER_PASSWORD: usize = 2;

    pub const REVIEW_USER_ID: usize = 1;
    pub const REVIEW_MOVIE_ID: usize = 2;
    pub const REVIEW_TEXT: usize = 3;
    pub const REVIEW_RATING: usize = 5;
}

/// The seed data does not carry a hyperlink column
const MISSING_HYPERLINK: &str = "nan";

/// One row of the movies file
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub synopsis: String,
    pub director: String,
    pub actors: Vec<String>,
    pub runtime: u32,
    pub rating: f32,
    pub date: NaiveDate,
    pub back_hyperlink: String,
    pub image_hyperlink: String,
}

impl MovieRecord {
    /// Build the movie entity. Genres are not attached here because the
    /// association needs the `Genre` values as well.
    pub fn to_movie(&self) -> Movie {
        Movie::new(self.date, self.title.clone())
            .with_id(self.id)
            .with_synopsis(self.synopsis.clone())
            .with_hyperlink(MISSING_HYPERLINK)
            .with_image_hyperlink(self.image_hyperlink.clone())
            .with_back_hyperlink(self.back_hyperlink.clone())
            .with_rating(self.rating)
            .with_runtime(self.runtime)
            .with_director(self.director.clone())
            .with_actors(self.actors.clone())
    }
}

/// One row of the users file. The password is still plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub external_id: String,
    pub username: String,
    pub password: String,
}

/// One row of the reviews file
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub user_external_id: String,
    pub movie_id: MovieId,
    pub text: String,
    pub rating: i32,
}

/// Field access with file/line context for error messages
struct Row<'a> {
    file: &'a str,
    line: usize,
    record: StringRecord,
}

impl Row<'_> {
    fn text(&self, column: usize, name: &str) -> Result<&str> {
        self.record.get(column).ok_or_else(|| CatalogError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason: format!("Missing {}", name),
        })
    }

    fn parse<T>(&self, column: usize, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.text(column, name)?;
        raw.parse().map_err(|e| CatalogError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason: format!("Invalid {} '{}': {}", name, raw, e),
        })
    }

    fn date(&self, column: usize, name: &str) -> Result<NaiveDate> {
        let raw = self.text(column, name)?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| CatalogError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason: format!("Invalid {} '{}': {}", name, raw, e),
        })
    }

    fn list(&self, column: usize, name: &str) -> Result<Vec<String>> {
        Ok(split_list(self.text(column, name)?))
    }
}

/// Read every data row of a CSV file, skipping the header
fn read_rows<'a>(path: &Path, file_name: &'a str) -> Result<Vec<Row<'a>>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        if record.iter().all(str::is_empty) {
            continue; // Skip empty lines
        }
        rows.push(Row {
            file: file_name,
            line,
            record,
        });
    }
    Ok(rows)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movies file
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let file_name = display_name(path);
    let rows = read_rows(path, &file_name)?;

    let mut movies = Vec::with_capacity(rows.len());
    for row in rows {
        movies.push(MovieRecord {
            id: row.parse(columns::MOVIE_ID, "movie id")?,
            title: row.text(columns::MOVIE_TITLE, "title")?.to_string(),
            genres: row.list(columns::MOVIE_GENRES, "genres")?,
            synopsis: row.text(columns::MOVIE_SYNOPSIS, "synopsis")?.to_string(),
            director: row.text(columns::MOVIE_DIRECTOR, "director")?.to_string(),
            actors: row.list(columns::MOVIE_ACTORS, "actors")?,
            runtime: row.parse(columns::MOVIE_RUNTIME, "runtime")?,
            rating: row.parse(columns::MOVIE_RATING, "rating")?,
            date: row.date(columns::MOVIE_DATE, "date")?,
            back_hyperlink: row.text(columns::MOVIE_BACK_LINK, "back link")?.to_string(),
            image_hyperlink: row.text(columns::MOVIE_IMAGE_LINK, "image link")?.to_string(),
        });
    }

    tracing::debug!(file = %file_name, count = movies.len(), "Parsed movies");
    Ok(movies)
}

/// Parse the users file
pub fn parse_users(path: &Path) -> Result<Vec<UserRecord>> {
    let file_name = display_name(path);
    let rows = read_rows(path, &file_name)?;

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        users.push(UserRecord {
            external_id: row.text(columns::USER_ID, "user id")?.to_string(),
            username: row.text(columns::USER_NAME, "username")?.to_string(),
            password: row.text(columns::USER_PASSWORD, "password")?.to_string(),
        });
    }

    tracing::debug!(file = %file_name, count = users.len(), "Parsed users");
    Ok(users)
}

/// Parse the reviews file
pub fn parse_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file_name = display_name(path);
    let rows = read_rows(path, &file_name)?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        reviews.push(ReviewRecord {
            user_external_id: row.text(columns::REVIEW_USER_ID, "user id")?.to_string(),
            movie_id: row.parse(columns::REVIEW_MOVIE_ID, "movie id")?,
            text: row.text(columns::REVIEW_TEXT, "review text")?.to_string(),
            rating: row.parse(columns::REVIEW_RATING, "rating")?,
        });
    }

    tracing::debug!(file = %file_name, count = reviews.len(), "Parsed reviews");
    Ok(reviews)
}

/// Split a comma-separated cell
///
/// Example: "Action,Adventure, Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
