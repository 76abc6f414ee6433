//! Error types for the service layer.

use catalog::{CatalogError, MovieId};
use thiserror::Error;

/// Errors raised by services, the loader and configuration
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Movie {0} does not exist")]
    NonExistentMovie(MovieId),

    #[error("No movie with rank {0}")]
    NonExistentRank(MovieId),

    #[error("Unknown user {0}")]
    UnknownUser(String),

    #[error("Username {0} is already taken")]
    NameNotUnique(String),

    /// Unknown username or wrong password. The two are not told apart.
    #[error("Username or password is incorrect")]
    Authentication,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ServiceError>;
