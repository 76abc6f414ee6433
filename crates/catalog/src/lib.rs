//! # Catalog Crate
//!
//! Entity model and date-ordered movie index for the review catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, Movie, Genre, Review) and the helpers
//!   that link them on both sides
//! - **index**: `MovieIndex`, movies by id in O(1) and in release-date order
//!   (O(log n) search, O(n) insert)
//! - **parser**: Parse the CSV seed files into plain records
//! - **error**: Error types shared by the whole workspace
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Genre, Movie, MovieIndex, make_genre_association};
//!
//! let mut index = MovieIndex::new();
//! index.insert(Movie::new(date, "Guardians of the Galaxy").with_id(1))?;
//!
//! let mut genre = Genre::new("Action");
//! make_genre_association(index.get_mut(1).unwrap(), &mut genre)?;
//!
//! let next = index.date_of_next(index.first().unwrap());
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use index::MovieIndex;
pub use parser::{MovieRecord, ReviewRecord, UserRecord};
pub use types::{Genre, Movie, MovieId, Review, User, make_genre_association, make_review};

// Dates are part of the public API
pub use chrono::NaiveDate;
