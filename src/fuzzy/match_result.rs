//! Ranked quick-open results
//!
//! A `MatchResult` is one entry of a fuzzy query response: a path, the score
//! the core ranked it with, and the character offsets of the filename that
//! matched the query.

use std::path::Path;

use crate::rpc::protocol::WireMatch;

/// One ranked path returned by the fuzzy core
///
/// Immutable once built. `match_indices` are character offsets into the
/// filename component of `path`, never into the full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    path: String,
    score: i64,
    match_indices: Vec<usize>,
}

/// A run of consecutive filename characters that are either all matched or
/// all unmatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameSegment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

impl MatchResult {
    /// Build a result, discarding highlight offsets that fall outside the
    /// filename
    ///
    /// Callers outside the crate go through `from_wire`, which rejects empty
    /// paths:
    ///
    /// ```compile_fail
    /// let _ = quickopen::MatchResult::new("", 0, vec![]);
    /// ```
    pub(crate) fn new(path: impl Into<String>, score: i64, match_indices: Vec<usize>) -> Self {
        let path = path.into();
        debug_assert!(!path.is_empty(), "match result path must not be empty");

        let filename_len = filename_of(&path).chars().count();
        let mut match_indices = match_indices;
        let before = match_indices.len();
        match_indices.retain(|&i| i < filename_len);
        if match_indices.len() != before {
            log::debug!(
                "Dropped {} highlight offsets outside filename of {}",
                before - match_indices.len(),
                path
            );
        }

        Self {
            path,
            score,
            match_indices,
        }
    }

    /// Convert a wire record, rejecting records without a path
    pub fn from_wire(wire: WireMatch) -> Option<Self> {
        if wire.result_name.is_empty() {
            log::debug!("Skipping fuzzy result with empty path");
            return None;
        }
        Some(Self::new(
            wire.result_name,
            wire.score,
            wire.match_indices.unwrap_or_default(),
        ))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn match_indices(&self) -> &[usize] {
        &self.match_indices
    }

    /// Last component of the path, or the whole path when it has none
    pub fn filename(&self) -> &str {
        filename_of(&self.path)
    }

    /// Split the filename into matched and unmatched runs for highlighting
    ///
    /// Offsets are counted in characters, so multi-byte filenames split on
    /// character boundaries.
    pub fn filename_segments(&self) -> Vec<FilenameSegment<'_>> {
        let name = self.filename();
        let mut segments = Vec::new();
        let mut start = 0;
        let mut current: Option<bool> = None;

        for (char_idx, (byte_idx, _)) in name.char_indices().enumerate() {
            let matched = self.match_indices.contains(&char_idx);
            match current {
                Some(run) if run == matched => {}
                Some(run) => {
                    segments.push(FilenameSegment {
                        text: &name[start..byte_idx],
                        matched: run,
                    });
                    start = byte_idx;
                    current = Some(matched);
                }
                None => current = Some(matched),
            }
        }

        if let Some(run) = current {
            segments.push(FilenameSegment {
                text: &name[start..],
                matched: run,
            });
        }

        segments
    }
}

fn filename_of(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
#[path = "match_result_tests.rs"]
mod match_result_tests;
