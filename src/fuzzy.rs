pub mod generation;
pub mod match_result;

// Re-export public types
pub use generation::Generation;
pub use match_result::{FilenameSegment, MatchResult};
