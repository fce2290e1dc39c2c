//! Quick-open fuzzy path picker
//!
//! The quick-open subsystem takes keystrokes from a search field, issues
//! debounced queries to an external fuzzy-matching core, keeps the ranked
//! suggestions for the latest query and drives keyboard selection until a
//! path is confirmed or the panel is dismissed.

pub mod app;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod quick_open;
pub mod rpc;


pub use error::QuickOpenError;
pub use fuzzy::{Generation, MatchResult};
pub use quick_open::{Direction, OpenState, PanelSession, PanelState};
