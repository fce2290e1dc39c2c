// Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

use crate::quick_open::debouncer::DEFAULT_DEBOUNCE_MS;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_MAX_VISIBLE_ROWS: usize = 6;
pub const DEFAULT_CORE_METHOD: &str = "quick_open";

/// Shorter timeouts would fail queries before any core could answer
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
pub const MAX_VISIBLE_ROWS_LIMIT: usize = 50;

/// Quick-open behaviour section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuickOpenConfig {
    /// Idle window before a typed query is sent
    pub debounce_ms: u64,
    /// A query without an answer after this long counts as failed
    pub request_timeout_ms: u64,
    /// Suggestions shown without scrolling
    pub max_visible_rows: usize,
    /// Directory results are resolved against; defaults to the working dir
    pub root: Option<PathBuf>,
}

impl Default for QuickOpenConfig {
    fn default() -> Self {
        QuickOpenConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_visible_rows: DEFAULT_MAX_VISIBLE_ROWS,
            root: None,
        }
    }
}

impl QuickOpenConfig {
    /// Pull out-of-range values back into bounds, describing each change
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut adjusted = Vec::new();

        if self.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS {
            adjusted.push(format!(
                "request_timeout_ms = {} raised to {}",
                self.request_timeout_ms, MIN_REQUEST_TIMEOUT_MS
            ));
            self.request_timeout_ms = MIN_REQUEST_TIMEOUT_MS;
        }

        let rows = self.max_visible_rows.clamp(1, MAX_VISIBLE_ROWS_LIMIT);
        if rows != self.max_visible_rows {
            adjusted.push(format!(
                "max_visible_rows = {} clamped to {}",
                self.max_visible_rows, rows
            ));
            self.max_visible_rows = rows;
        }

        adjusted
    }
}

/// External fuzzy core section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Core executable; without one the in-process index answers queries
    pub command: Option<String>,
    pub args: Vec<String>,
    /// RPC method used for fuzzy queries
    pub method: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            command: None,
            args: Vec::new(),
            method: DEFAULT_CORE_METHOD.to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub quick_open: QuickOpenConfig,
    #[serde(default)]
    pub core: CoreConfig,
}
