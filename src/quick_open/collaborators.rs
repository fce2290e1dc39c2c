//! Narrow interfaces the panel session drives
//!
//! The session never sees a concrete UI. It is handed a presenter and a file
//! opener at construction, which keeps the state machine testable without a
//! terminal.

use std::path::Path;

use super::suggestion_store::SuggestionStore;
use crate::error::QuickOpenError;

/// Shows and hides the panel and re-renders it on changes
pub trait PanelPresenter {
    fn present(&mut self);

    /// Hide the panel and clear its input field
    fn dismiss(&mut self);

    /// The result list was replaced or cleared; the selection is gone
    fn suggestions_changed(&mut self, store: &SuggestionStore);

    fn selection_changed(&mut self, _selected: Option<usize>) {}
}

/// Opens a confirmed path in the host application
pub trait FileOpener {
    fn open_path(&mut self, path: &Path) -> Result<(), QuickOpenError>;
}
