//! Error types for the catalog crate.
//!
//! Every invariant violation the catalog can detect is a distinct variant, so
//! callers can match on the failure instead of parsing messages. Lookups that
//! are expected to miss (by id, by username) never produce an error; they
//! return `Option` or an empty `Vec`.

use crate::types::MovieId;
use thiserror::Error;

/// Errors raised by the entity model, the movie index and the CSV parser
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A review is not listed by both its user and its movie
    #[error("Broken association: {0}")]
    InvalidAssociation(String),

    /// The genre is already applied to the movie
    #[error("Genre {genre} already applied to Movie \"{title}\"")]
    DuplicateAssociation { genre: String, title: String },

    /// A movie with this id is already stored
    #[error("Movie id {id} is already present in the index")]
    DuplicateMovieId { id: MovieId },

    /// The movie has no id yet, so it cannot be indexed or associated
    #[error("Movie \"{title}\" has no id")]
    UnsavedMovie { title: String },

    /// A user with this username is already stored
    #[error("Username {0} is already taken")]
    DuplicateUsername(String),

    /// A genre with this name is already stored
    #[error("Genre {0} is already stored")]
    DuplicateGenre(String),

    /// Referenced entity doesn't exist (e.g., review for non-existent movie)
    #[error("Missing reference: {entity} with key {key}")]
    MissingReference { entity: String, key: String },

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected a record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
