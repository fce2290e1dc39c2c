//! In-process fuzzy core
//!
//! Stands in for the external core when none is configured: indexes the files
//! under the quick-open root once and answers queries with skim scoring over
//! the filename, falling back to the whole path.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use walkdir::{DirEntry, WalkDir};

use super::protocol::WireMatch;
use super::{FuzzyBackend, RpcError};

const MAX_INDEXED_FILES: usize = 50_000;
const MAX_RESULTS: usize = 200;
const IGNORED_DIRS: &[&str] = &["target", "node_modules"];

pub struct LocalIndex {
    paths: Arc<Vec<String>>,
}

impl fmt::Debug for LocalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalIndex")
            .field("paths", &self.paths.len())
            .finish()
    }
}

impl LocalIndex {
    /// Index regular files under `root`, skipping hidden and build directories
    pub fn build(root: &Path) -> Self {
        let paths: Vec<String> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(root)
                    .ok()
                    .map(|relative| relative.to_string_lossy().into_owned())
            })
            .take(MAX_INDEXED_FILES)
            .collect();

        log::debug!("Indexed {} files under {}", paths.len(), root.display());
        Self::from_paths(paths)
    }

    pub fn from_paths(paths: Vec<String>) -> Self {
        Self {
            paths: Arc::new(paths),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<WireMatch> {
        search_paths(&self.paths, query)
    }
}

impl FuzzyBackend for LocalIndex {
    fn query(&self, query: String) -> BoxFuture<'static, Result<Vec<WireMatch>, RpcError>> {
        let paths = Arc::clone(&self.paths);
        Box::pin(async move { Ok(search_paths(&paths, &query)) })
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && IGNORED_DIRS.contains(&name.as_ref()))
}

fn search_paths(paths: &[String], query: &str) -> Vec<WireMatch> {
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut matches: Vec<WireMatch> = paths
        .iter()
        .filter_map(|path| {
            let filename = Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(path);

            if let Some((score, indices)) = matcher.fuzzy_indices(filename, query) {
                return Some(WireMatch {
                    result_name: path.clone(),
                    score,
                    match_indices: Some(indices),
                });
            }

            // Directory-only matches rank below filename matches
            matcher.fuzzy_match(path, query).map(|score| WireMatch {
                result_name: path.clone(),
                score: score / 2,
                match_indices: None,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.result_name.len().cmp(&b.result_name.len()))
    });
    matches.truncate(MAX_RESULTS);
    matches
}
