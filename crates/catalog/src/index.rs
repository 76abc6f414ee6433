//! Date-ordered movie index.
//!
//! Movies live in an append-only arena. Two views point into it:
//! - `order`: arena slots sorted by release date, stable for equal dates.
//!   Finding a position is O(log n); inserting shifts the tail, so O(n).
//! - `by_id`: movie id to arena slot, for O(1) point lookups
//!
//! Both views are updated in the same call and only after every check has
//! passed, so they always describe the same set of movies.

use crate::error::{CatalogError, Result};
use crate::types::{Movie, MovieId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Movies retrievable by id and by position in release-date order
#[derive(Debug, Clone, Default)]
pub struct MovieIndex {
    slots: Vec<Movie>,
    order: Vec<usize>,
    by_id: HashMap<MovieId, usize>,
}

impl MovieIndex {
    /// Creates a new, empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movie after every stored movie with the same or an earlier date.
    ///
    /// The movie must carry an id that is not already indexed; otherwise the
    /// index is left untouched and an error is returned.
    pub fn insert(&mut self, movie: Movie) -> Result<()> {
        let id = movie.id().ok_or_else(|| CatalogError::UnsavedMovie {
            title: movie.title().to_string(),
        })?;
        if self.by_id.contains_key(&id) {
            return Err(CatalogError::DuplicateMovieId { id });
        }

        let position = self.upper_bound(movie.date());
        let slot = self.slots.len();
        self.slots.push(movie);
        self.order.insert(position, slot);
        self.by_id.insert(id, slot);

        tracing::trace!(movie_id = id, position, "Indexed movie");
        Ok(())
    }

    /// Get a movie by id
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&slot| &self.slots[slot])
    }

    /// Mutable access for association calls. `Movie` does not expose its
    /// date for writing, so this cannot break the ordering.
    pub fn get_mut(&mut self, id: MovieId) -> Option<&mut Movie> {
        let slot = *self.by_id.get(&id)?;
        self.slots.get_mut(slot)
    }

    /// Movies for the ids that exist, in the order the ids were given
    pub fn get_by_ids(&self, ids: &[MovieId]) -> Vec<&Movie> {
        ids.iter().filter_map(|&id| self.get(id)).collect()
    }

    /// Movie with the earliest release date
    pub fn first(&self) -> Option<&Movie> {
        self.order.first().map(|&slot| &self.slots[slot])
    }

    /// Movie with the latest release date (the last inserted among ties)
    pub fn last(&self) -> Option<&Movie> {
        self.order.last().map(|&slot| &self.slots[slot])
    }

    /// Movie at a 0-based position in release-date order
    pub fn at_position(&self, position: usize) -> Option<&Movie> {
        self.order.get(position).map(|&slot| &self.slots[slot])
    }

    /// All movies released on `date`, in index order
    pub fn movies_on(&self, date: NaiveDate) -> Vec<&Movie> {
        let start = self.lower_bound(date);
        self.order[start..]
            .iter()
            .map(|&slot| &self.slots[slot])
            .take_while(|movie| movie.date() == date)
            .collect()
    }

    /// The closest release date strictly before `movie`'s date.
    ///
    /// Only the date is consulted, so `movie` does not have to be stored.
    pub fn date_of_previous(&self, movie: &Movie) -> Option<NaiveDate> {
        let start = self.lower_bound(movie.date());
        let slot = *self.order[..start].last()?;
        Some(self.slots[slot].date())
    }

    /// The closest release date strictly after `movie`'s date
    pub fn date_of_next(&self, movie: &Movie) -> Option<NaiveDate> {
        let end = self.upper_bound(movie.date());
        let slot = *self.order.get(end)?;
        Some(self.slots[slot].date())
    }

    /// Iterate movies in release-date order
    pub fn iter(&self) -> impl Iterator<Item = &Movie> + '_ {
        self.order.iter().map(|&slot| &self.slots[slot])
    }

    /// Ids of all movies in release-date order
    pub fn ids(&self) -> Vec<MovieId> {
        self.iter().filter_map(Movie::id).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First position whose date is not earlier than `date`
    fn lower_bound(&self, date: NaiveDate) -> usize {
        self.order
            .partition_point(|&slot| self.slots[slot].date() < date)
    }

    /// First position whose date is later than `date`
    fn upper_bound(&self, date: NaiveDate) -> usize {
        self.order
            .partition_point(|&slot| self.slots[slot].date() <= date)
    }
}
