//! # Store Crate
//!
//! The repository facade and the service layer of the review catalog.
//!
//! ## Main Components
//!
//! - **repository**: `MemoryRepository`, the single owner of every entity
//! - **loader**: Populate a repository from the CSV seed files
//! - **services**: Validated operations returning owned views
//! - **dto**: Serializable views (`MovieDetail`, `GenrePage`, ...)
//! - **config**: `StoreConfig`, read from TOML
//! - **shared**: `SharedStore`, a reader/writer handle for threaded callers
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{MemoryRepository, StoreConfig, loader, services};
//!
//! let config = StoreConfig::default();
//! let mut repo = MemoryRepository::with_query_engine(config.query_engine());
//! loader::populate(&config.data_dir, &mut repo, &config)?;
//!
//! let page = services::browse_genre("Action", Some("Guardians"), 0, config.movies_per_page, &repo);
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod loader;
pub mod repository;
pub mod services;
pub mod shared;

pub use config::StoreConfig;
pub use error::{Result, ServiceError};
pub use loader::{LoadSummary, populate};
pub use repository::MemoryRepository;
pub use shared::SharedStore;
