use std::path::{Path, PathBuf};
use std::time::Instant;

use super::presenter::{PickOpener, TerminalPresenter};
use crate::config::types::MAX_VISIBLE_ROWS_LIMIT;
use crate::quick_open::{PanelSession, QueryDispatcher};

/// Application state
pub struct App {
    pub(super) session: PanelSession<TerminalPresenter, PickOpener>,
    pub(super) status: Option<String>,
    pub(super) should_quit: bool,
    pub(super) max_visible_rows: usize,
}

impl App {
    pub fn new(dispatcher: QueryDispatcher, root: PathBuf, max_visible_rows: usize) -> Self {
        let session = PanelSession::new(TerminalPresenter::new(), PickOpener::default(), dispatcher)
            .with_root(root);

        Self {
            session,
            status: None,
            should_quit: false,
            max_visible_rows: max_visible_rows.clamp(1, MAX_VISIBLE_ROWS_LIMIT),
        }
    }

    /// Message shown in the status line until the panel is next opened
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn session(&self) -> &PanelSession<TerminalPresenter, PickOpener> {
        &self.session
    }

    /// Path confirmed by the user, if any
    pub fn picked(&self) -> Option<&Path> {
        self.session.opener().picked()
    }

    /// Latest moment the event loop may sleep until
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    /// Send due queries and apply arrived responses
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub fn update_at(&mut self, now: Instant) {
        self.session.tick_at(now);
        self.session.poll_responses();
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
