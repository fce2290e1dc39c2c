use std::path::{Path, PathBuf};

use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

use crate::error::QuickOpenError;
use crate::quick_open::{FileOpener, PanelPresenter, SuggestionStore};

const PLACEHOLDER: &str = "Type to search files";

fn query_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();

    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Quick Open ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    // Remove default underline from cursor line
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(PLACEHOLDER);

    textarea
}

/// Owns the panel's query field and visibility
pub struct TerminalPresenter {
    textarea: TextArea<'static>,
    visible: bool,
    match_count: usize,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            textarea: query_textarea(),
            visible: false,
            match_count: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    /// Current query text (single line)
    pub fn query(&self) -> &str {
        self.textarea.lines().first().map_or("", String::as_str)
    }

    /// Number of suggestions last handed to the panel
    pub fn match_count(&self) -> usize {
        self.match_count
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelPresenter for TerminalPresenter {
    fn present(&mut self) {
        self.visible = true;
        self.textarea = query_textarea();
        self.match_count = 0;
    }

    fn dismiss(&mut self) {
        self.visible = false;
        self.textarea = query_textarea();
        self.match_count = 0;
    }

    fn suggestions_changed(&mut self, store: &SuggestionStore) {
        log::debug!(
            "Showing {} suggestions for {:?} ({})",
            store.len(),
            store.query(),
            store.generation()
        );
        self.match_count = store.len();
    }
}

/// Records the confirmed path so the binary can print it on exit
#[derive(Debug, Default)]
pub struct PickOpener {
    picked: Option<PathBuf>,
}

impl PickOpener {
    pub fn picked(&self) -> Option<&Path> {
        self.picked.as_deref()
    }
}

impl FileOpener for PickOpener {
    fn open_path(&mut self, path: &Path) -> Result<(), QuickOpenError> {
        if !path.exists() {
            return Err(QuickOpenError::Open {
                path: path.to_path_buf(),
                message: "no such file".to_string(),
            });
        }

        self.picked = Some(path.to_path_buf());
        Ok(())
    }
}
