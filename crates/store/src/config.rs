//! Store configuration, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working configuration:
//!
//! ```toml
//! data_dir = "data"
//! movies_file = "Data1000Movies.csv"
//! users_file = "users.csv"
//! reviews_file = "comments.csv"
//! movies_per_page = 4
//! search_threshold = 70
//! password_cost = 12
//! ```

use crate::error::Result;
use query::{DEFAULT_THRESHOLD, QueryEngine};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_movies_file")]
    pub movies_file: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_reviews_file")]
    pub reviews_file: String,
    #[serde(default = "default_movies_per_page")]
    pub movies_per_page: usize,
    /// Fuzzy title scores must be strictly above this
    #[serde(default = "default_search_threshold")]
    pub search_threshold: u8,
    /// bcrypt work factor for stored passwords
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_movies_file() -> String {
    "Data1000Movies.csv".to_string()
}

fn default_users_file() -> String {
    "users.csv".to_string()
}

fn default_reviews_file() -> String {
    "comments.csv".to_string()
}

fn default_movies_per_page() -> usize {
    4
}

fn default_search_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            movies_file: default_movies_file(),
            users_file: default_users_file(),
            reviews_file: default_reviews_file(),
            movies_per_page: default_movies_per_page(),
            search_threshold: default_search_threshold(),
            password_cost: default_password_cost(),
        }
    }
}

impl StoreConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded store configuration");
        Ok(config)
    }

    pub fn movies_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.movies_file)
    }

    pub fn users_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.users_file)
    }

    pub fn reviews_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.reviews_file)
    }

    /// Query engine using the configured search threshold
    pub fn query_engine(&self) -> QueryEngine {
        QueryEngine::new().with_threshold(self.search_threshold)
    }
}
