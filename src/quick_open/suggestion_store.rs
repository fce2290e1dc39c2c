//! Suggestion store
//!
//! Single source of truth for the suggestions currently shown. The result list
//! is only ever swapped as a whole, and only by the response for the current
//! generation.

use std::fmt;

use crate::fuzzy::{Generation, MatchResult};

/// Outcome of offering a response to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreUpdate {
    /// The response belonged to the current generation and replaced the results
    Applied,
    /// The response belonged to an older generation and was dropped
    Stale,
}

/// A row index outside the current results
///
/// Seeing this means the cursor and the store disagree, which is a bug in the
/// caller rather than a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "suggestion index {} out of range for {} results",
            self.index, self.len
        )
    }
}

impl std::error::Error for IndexOutOfRange {}

#[derive(Debug, Clone, Default)]
pub struct SuggestionStore {
    generation: Generation,
    query: String,
    results: Vec<MatchResult>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `generation` current; responses for anything older are dropped
    /// from now on
    pub fn track(&mut self, generation: Generation) {
        debug_assert!(
            generation >= self.generation,
            "generations only move forward"
        );
        self.generation = generation;
    }

    /// Replace the results if `generation` is still current
    pub fn replace(
        &mut self,
        generation: Generation,
        query: impl Into<String>,
        results: Vec<MatchResult>,
    ) -> StoreUpdate {
        if generation != self.generation {
            log::debug!(
                "Dropping stale response {} (current {})",
                generation,
                self.generation
            );
            return StoreUpdate::Stale;
        }

        self.query = query.into();
        self.results = results;
        StoreUpdate::Applied
    }

    /// Empty the store and move to a fresh generation, so every response
    /// still in flight is dropped when it arrives
    pub fn clear(&mut self) {
        self.results.clear();
        self.query.clear();
        self.generation = Generation::next();
    }

    pub fn get(&self, index: usize) -> Result<&MatchResult, IndexOutOfRange> {
        self.results.get(index).ok_or(IndexOutOfRange {
            index,
            len: self.results.len(),
        })
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Query the current results were produced for
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
#[path = "suggestion_store_tests.rs"]
mod suggestion_store_tests;
